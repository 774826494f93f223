//! UTC day windows used to query completed tasks.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A single UTC calendar day.
///
/// Todoist is queried with the inclusive range
/// `[00:00:00, 23:59:59.999999]` of this day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayWindow {
    date: NaiveDate,
}

impl DayWindow {
    /// Creates a window covering `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// The day `days_ago` days before `today`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tasklog_core::DayWindow;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    /// let window = DayWindow::days_ago(today, 1).unwrap();
    /// assert_eq!(window.iso_date(), "2025-02-28");
    /// ```
    pub fn days_ago(today: NaiveDate, days_ago: u32) -> Result<Self> {
        today
            .checked_sub_days(Days::new(u64::from(days_ago)))
            .map(Self::new)
            .ok_or_else(|| {
                Error::validation_field(
                    "days_ago",
                    format!("{days_ago} days before {today} is out of range"),
                )
            })
    }

    /// The day `days_ago` days before the current UTC date.
    pub fn from_now(days_ago: u32) -> Result<Self> {
        Self::days_ago(Utc::now().date_naive(), days_ago)
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// First instant of the day.
    pub fn start(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last representable microsecond of the day.
    pub fn end(&self) -> DateTime<Utc> {
        self.start() + (TimeDelta::days(1) - TimeDelta::microseconds(1))
    }

    /// Start of the day as `YYYY-MM-DDT00:00:00Z`.
    pub fn start_iso(&self) -> String {
        self.start().format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// End of the day as `YYYY-MM-DDT23:59:59.999999Z`.
    pub fn end_iso(&self) -> String {
        self.end().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }

    /// The date as `YYYY-MM-DD`, the format used in the sheet's date column.
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for DayWindow {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

/// Splits an ISO timestamp into `(short_year, short_month, iso_date)`.
///
/// `"2025-03-14T00:00:00Z"` yields `("25", "03", "2025-03-14")`.
pub fn split_date(iso: &str) -> Result<(String, String, String)> {
    let part = |range: std::ops::Range<usize>| {
        iso.get(range)
            .map(str::to_string)
            .ok_or_else(|| Error::validation(format!("'{iso}' is not an ISO date")))
    };
    Ok((part(2..4)?, part(5..7)?, part(0..10)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_ago_crosses_month_boundary() {
        let window = DayWindow::days_ago(date(2025, 3, 1), 1).unwrap();
        assert_eq!(window.date(), date(2025, 2, 28));
    }

    #[test]
    fn test_days_ago_zero_is_today() {
        let window = DayWindow::days_ago(date(2025, 3, 14), 0).unwrap();
        assert_eq!(window.date(), date(2025, 3, 14));
    }

    #[test]
    fn test_days_ago_out_of_range() {
        let result = DayWindow::days_ago(NaiveDate::MIN, 1);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_iso_bounds() {
        let window = DayWindow::new(date(2025, 3, 14));
        assert_eq!(window.start_iso(), "2025-03-14T00:00:00Z");
        assert_eq!(window.end_iso(), "2025-03-14T23:59:59.999999Z");
        assert_eq!(window.iso_date(), "2025-03-14");
        assert_eq!(window.to_string(), "2025-03-14");
    }

    #[test]
    fn test_end_is_inside_the_day() {
        let window = DayWindow::new(date(2024, 2, 29));
        assert_eq!(window.end().date_naive(), window.date());
        assert!(window.start() < window.end());
    }

    #[test]
    fn test_split_date() {
        let (year, month, iso) = split_date("2025-03-14T00:00:00Z").unwrap();
        assert_eq!(year, "25");
        assert_eq!(month, "03");
        assert_eq!(iso, "2025-03-14");
    }

    #[test]
    fn test_split_date_too_short() {
        assert!(split_date("2025-03").is_err());
    }
}
