//! In-memory [`TaskSource`] and [`SheetStore`] implementations.
//!
//! Used by tests across the workspace.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::traits::{SheetStore, TaskSource};
use crate::types::{CellRef, CompletedTask, DayWindow, Project, SheetRows, TabName, column_index};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A task source backed by fixed projects and per-day task lists.
#[derive(Debug, Default)]
pub struct MockTaskSource {
    projects: Vec<Project>,
    tasks: HashMap<NaiveDate, Vec<CompletedTask>>,
    queried: Mutex<Vec<NaiveDate>>,
}

impl MockTaskSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project.
    pub fn with_project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.projects.push(Project::new(id, name));
        self
    }

    /// Sets the tasks completed on `date`, one task per content string.
    pub fn with_tasks(mut self, date: NaiveDate, contents: &[&str]) -> Self {
        let tasks = contents
            .iter()
            .enumerate()
            .map(|(i, content)| CompletedTask::new(format!("{date}-{i}"), *content))
            .collect();
        self.tasks.insert(date, tasks);
        self
    }

    /// Days for which `completed_tasks` was called, in call order.
    pub fn queried_days(&self) -> Vec<NaiveDate> {
        lock(&self.queried).clone()
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn resolve_project(&self, name: &str) -> Result<String> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id.clone())
            .ok_or_else(|| Error::ProjectNotFound {
                name: name.to_string(),
            })
    }

    async fn completed_tasks(
        &self,
        window: &DayWindow,
        project_id: &str,
    ) -> Result<Vec<CompletedTask>> {
        lock(&self.queried).push(window.date());
        Ok(self
            .tasks
            .get(&window.date())
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|t| t.project_id.as_deref().is_none_or(|id| id == project_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// A spreadsheet held in memory, tab by tab.
#[derive(Debug, Default)]
pub struct MockSheetStore {
    tabs: Mutex<Vec<(String, SheetRows)>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_writes: bool,
}

impl MockSheetStore {
    /// Creates a spreadsheet with no tabs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tab with the given rows.
    pub fn with_tab(self, name: impl Into<String>, rows: SheetRows) -> Self {
        lock(&self.tabs).push((name.into(), rows));
        self
    }

    /// Makes every `write_cell` call fail with a server error.
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Every `(cell, value)` written, in write order.
    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }

    /// Current value of `cell`, empty strings included.
    pub fn value_at(&self, cell: &CellRef) -> Option<String> {
        let tabs = lock(&self.tabs);
        let (_, rows) = tabs.iter().find(|(name, _)| name == cell.tab().as_str())?;
        let col = column_index(cell.column())?;
        rows.get(cell.row() as usize - 1)?.get(col).cloned()
    }
}

#[async_trait]
impl SheetStore for MockSheetStore {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        Ok(lock(&self.tabs).iter().map(|(name, _)| name.clone()).collect())
    }

    async fn rows(&self, tab: &TabName) -> Result<SheetRows> {
        lock(&self.tabs)
            .iter()
            .find(|(name, _)| name == tab.as_str())
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| {
                Error::api(
                    "sheets",
                    400,
                    format!("Unable to parse range: {}", tab.rows_range()),
                )
            })
    }

    async fn cell(&self, cell: &CellRef) -> Result<Option<String>> {
        Ok(self.value_at(cell).filter(|v| !v.is_empty()))
    }

    async fn write_cell(&self, cell: &CellRef, value: &str) -> Result<u32> {
        if self.fail_writes {
            return Err(Error::api("sheets", 500, "Internal error"));
        }
        let col = column_index(cell.column())
            .ok_or_else(|| Error::validation_field("column", cell.column().to_string()))?;
        let mut tabs = lock(&self.tabs);
        let (_, rows) = tabs
            .iter_mut()
            .find(|(name, _)| name == cell.tab().as_str())
            .ok_or_else(|| Error::api("sheets", 400, format!("Unable to parse range: {cell}")))?;

        let row_index = cell.row() as usize - 1;
        if rows.len() <= row_index {
            rows.resize(row_index + 1, Vec::new());
        }
        let row = &mut rows[row_index];
        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        row[col] = value.to_string();

        lock(&self.writes).push((cell.to_string(), value.to_string()));
        Ok(1)
    }
}
