//! Shared fixtures for sync integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;
use tasklog_core::SheetRows;
use tasklog_core::mock::{MockSheetStore, MockTaskSource};
use tasklog_sync::{SyncEngine, SyncOptions};

/// Project every fixture task belongs to.
pub const PROJECT: &str = "Journal";

/// Builds a date, panicking on invalid input.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A month tab: a header row, then one row per listed date.
///
/// Each entry is `(iso_date, target_value)`; an empty value leaves the
/// row without a column E.
pub fn month_rows(entries: &[(&str, &str)]) -> SheetRows {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Mood".to_string(),
        "Sleep".to_string(),
        "Notes".to_string(),
        "Tasks".to_string(),
    ]];
    for (iso, value) in entries {
        let mut row = vec![iso.to_string()];
        if !value.is_empty() {
            row.extend([String::new(), String::new(), String::new(), value.to_string()]);
        }
        rows.push(row);
    }
    rows
}

/// Sheet store, task source, and an engine over both.
pub struct TestHarness {
    /// Sheet store the engine writes to
    pub store: Arc<MockSheetStore>,

    /// Task source the engine reads from
    pub source: Arc<MockTaskSource>,
}

impl TestHarness {
    /// Creates a harness from a prepared store and source.
    pub fn new(store: MockSheetStore, source: MockTaskSource) -> Self {
        Self {
            store: Arc::new(store),
            source: Arc::new(source.with_project("p1", PROJECT)),
        }
    }

    /// An engine over this harness's store and source.
    pub fn engine(&self, options: SyncOptions) -> SyncEngine {
        SyncEngine::new(self.source.clone(), self.store.clone(), options)
    }
}
