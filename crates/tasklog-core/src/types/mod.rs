//! Core types for tasklog.

mod day;
mod proptests;
mod sheet;
mod task;

pub use day::{DayWindow, split_date};
pub use sheet::{CellRef, SheetRows, TabName, column_index, find_date_row};
pub use task::{CompletedTask, EMPTY_DAY_MARKER, Project, TASK_SEPARATOR, format_task_cell};
