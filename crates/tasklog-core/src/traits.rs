//! Seams between the sync engine and the services it talks to.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CellRef, CompletedTask, DayWindow, SheetRows, TabName};

/// Where completed tasks come from.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Returns the ID of the project named exactly `name`.
    ///
    /// Fails with [`Error::ProjectNotFound`](crate::Error::ProjectNotFound)
    /// when no project matches.
    async fn resolve_project(&self, name: &str) -> Result<String>;

    /// Tasks in `project_id` completed within `window`, oldest first.
    async fn completed_tasks(
        &self,
        window: &DayWindow,
        project_id: &str,
    ) -> Result<Vec<CompletedTask>>;
}

/// The spreadsheet the tasks are written into.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Titles of every tab in the spreadsheet.
    async fn list_tabs(&self) -> Result<Vec<String>>;

    /// Every row of `tab` (columns A through Z).
    async fn rows(&self, tab: &TabName) -> Result<SheetRows>;

    /// The value of a single cell, or `None` when it is empty.
    async fn cell(&self, cell: &CellRef) -> Result<Option<String>>;

    /// Writes `value` verbatim into `cell`, returning the number of cells
    /// the service reports as updated.
    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<u32>;
}
