//! What a sync run did, day by day.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use tasklog_core::{CellRef, TabName};

/// Result of examining one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DayOutcome {
    /// The month tab for the day does not exist.
    TabMissing {
        /// Tab that was looked for
        tab: TabName,
    },

    /// The tab exists but has no row for the date.
    DateMissing {
        /// Tab that was searched
        tab: TabName,
        /// Date that was looked for
        date: NaiveDate,
    },

    /// The target cell already holds a value. Ends the walk.
    AlreadyFilled {
        /// Cell that was checked
        cell: CellRef,
        /// Its current value
        value: String,
    },

    /// Tasks were written into the cell.
    Written {
        /// Cell that was written
        cell: CellRef,
        /// Value written
        value: String,
        /// Number of tasks in the value
        task_count: usize,
    },

    /// A dry run found the cell empty and would have written `value`.
    DryRun {
        /// Cell that would have been written
        cell: CellRef,
        /// Value that would have been written
        value: String,
        /// Number of tasks in the value
        task_count: usize,
    },
}

impl DayOutcome {
    /// Whether this day's cell was written.
    pub fn is_write(&self) -> bool {
        matches!(self, DayOutcome::Written { .. })
    }
}

impl fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOutcome::TabMissing { tab } => write!(f, "tab {tab} not found"),
            DayOutcome::DateMissing { tab, date } => {
                write!(f, "date {date} not found in tab {tab}")
            }
            DayOutcome::AlreadyFilled { cell, value } => {
                write!(f, "{cell} already has data: {value}")
            }
            DayOutcome::Written {
                cell, task_count, ..
            } => write!(f, "wrote {task_count} task(s) to {cell}"),
            DayOutcome::DryRun {
                cell, task_count, ..
            } => write!(f, "would write {task_count} task(s) to {cell}"),
        }
    }
}

/// Why the walk over past days ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A day with a filled cell was reached; older days were left alone.
    ReachedFilledCell,

    /// Every day in the lookback window was examined.
    LookbackExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::ReachedFilledCell => f.write_str("reached a filled cell"),
            StopReason::LookbackExhausted => f.write_str("lookback window exhausted"),
        }
    }
}

/// Per-day outcomes of a run, newest day first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// One entry per examined day, in the order examined
    pub days: Vec<(NaiveDate, DayOutcome)>,

    /// Why the run stopped
    pub stop: StopReason,
}

impl SyncReport {
    /// Number of cells written.
    pub fn written(&self) -> usize {
        self.days.iter().filter(|(_, o)| o.is_write()).count()
    }

    /// Outcome recorded for `date`, if that day was examined.
    pub fn outcome_for(&self, date: NaiveDate) -> Option<&DayOutcome> {
        self.days
            .iter()
            .find(|(d, _)| *d == date)
            .map(|(_, outcome)| outcome)
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (date, outcome) in &self.days {
            writeln!(f, "{date}: {outcome}")?;
        }
        write!(
            f,
            "{} day(s) examined, {} written; stopped: {}",
            self.days.len(),
            self.written(),
            self.stop
        )
    }
}
