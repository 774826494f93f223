//! Spreadsheet addressing: month tabs, A1 cell references, row lookup.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// English month abbreviations used in tab names, January first.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rows of a tab as returned by the values API.
///
/// Rows are ragged: trailing empty cells are omitted, and a row with no
/// values at all is an empty vector.
pub type SheetRows = Vec<Vec<String>>;

/// Name of a monthly tab, `Mon-YY` (e.g. `Mar-25`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabName(String);

impl TabName {
    /// The tab holding `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tasklog_core::TabName;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    /// assert_eq!(TabName::for_date(date).as_str(), "Mar-25");
    /// ```
    pub fn for_date(date: NaiveDate) -> Self {
        let month = MONTH_ABBREVIATIONS[date.month0() as usize];
        Self(format!("{month}-{:02}", date.year().rem_euclid(100)))
    }

    /// Builds a tab name from a two-digit year and a two-digit month
    /// (`"25"`, `"03"` → `Mar-25`).
    pub fn from_parts(short_year: &str, short_month: &str) -> Result<Self> {
        let month: usize = Some(short_month)
            .filter(|m| is_two_digits(m))
            .and_then(|m| m.parse().ok())
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| {
                Error::validation_field("month", format!("'{short_month}' is not a month (01-12)"))
            })?;
        if !is_two_digits(short_year) {
            return Err(Error::validation_field(
                "year",
                format!("'{short_year}' is not a two-digit year"),
            ));
        }
        Ok(Self(format!(
            "{}-{short_year}",
            MONTH_ABBREVIATIONS[month - 1]
        )))
    }

    /// The range covering every row of the tab, columns A through Z.
    pub fn rows_range(&self) -> String {
        format!("{}!A1:Z", self.0)
    }

    /// The tab name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TabName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single cell in A1 notation, e.g. `Mar-25!E15`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    tab: TabName,
    column: String,
    row: u32,
}

impl CellRef {
    /// Creates a reference to `column`/`row` (1-based) in `tab`.
    ///
    /// The column is normalized to upper case and must consist of letters.
    pub fn new(tab: TabName, column: &str, row: u32) -> Result<Self> {
        if column_index(column).is_none() {
            return Err(Error::validation_field(
                "column",
                format!("'{column}' is not a column letter"),
            ));
        }
        if row == 0 {
            return Err(Error::validation_field("row", "rows are 1-based"));
        }
        Ok(Self {
            tab,
            column: column.to_ascii_uppercase(),
            row,
        })
    }

    /// The tab this cell lives in.
    pub fn tab(&self) -> &TabName {
        &self.tab
    }

    /// Column letters, upper case.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// 1-based row number.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// A1 notation for this cell.
    pub fn a1(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.tab, self.column, self.row)
    }
}

fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Zero-based index of a column given in letters (`A` → 0, `Z` → 25,
/// `AA` → 26). Returns `None` for anything that is not letters.
pub fn column_index(column: &str) -> Option<usize> {
    if column.is_empty() {
        return None;
    }
    let mut index: usize = 0;
    for byte in column.bytes() {
        if !byte.is_ascii_alphabetic() {
            return None;
        }
        let digit = usize::from(byte.to_ascii_uppercase() - b'A') + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// 1-based number of the first row whose first cell equals `iso_date`.
///
/// Rows without any cells are skipped.
pub fn find_date_row(rows: &[Vec<String>], iso_date: &str) -> Option<u32> {
    rows.iter()
        .position(|row| row.first().is_some_and(|first| first == iso_date))
        .and_then(|i| u32::try_from(i + 1).ok())
}
