//! tasklog Sync: backfills a journal sheet from completed Todoist tasks.
//!
//! The [`SyncEngine`] walks backwards from yesterday, one day at a time.
//! For each day it finds the month tab and date row, and fills the target
//! cell with the tasks completed that day. It stops at the first cell that
//! is already filled.
//!
//! The engine only sees the [`TaskSource`](tasklog_core::TaskSource) and
//! [`SheetStore`](tasklog_core::SheetStore) traits, so it runs unchanged
//! against the HTTP clients or the in-memory mocks.

#![forbid(unsafe_code)]

pub mod engine;
pub mod report;

pub use engine::{DEFAULT_LOOKBACK_DAYS, DEFAULT_TARGET_COLUMN, SyncEngine, SyncOptions};
pub use report::{DayOutcome, StopReason, SyncReport};
