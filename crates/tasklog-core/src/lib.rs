//! tasklog Core: shared types, traits, and errors.
//!
//! This crate provides the foundational types used across all tasklog
//! crates. It has no internal tasklog dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Day windows, tab names, cell references, completed tasks
//! - [`traits`]: The [`TaskSource`] and [`SheetStore`] seams
//! - [`mock`]: In-memory implementations of both traits for tests
//! - [`retry`]: Backoff policy for transient API failures

#![forbid(unsafe_code)]

pub mod error;
pub mod mock;
pub mod retry;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use traits::{SheetStore, TaskSource};
pub use types::{
    CellRef, CompletedTask, DayWindow, Project, SheetRows, TabName, column_index, find_date_row,
    format_task_cell, split_date,
};
