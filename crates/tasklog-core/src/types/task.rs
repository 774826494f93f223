//! Completed tasks and the text written for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator placed between task contents in a cell.
pub const TASK_SEPARATOR: &str = "; ";

/// Cell value for a day on which nothing was completed.
pub const EMPTY_DAY_MARKER: &str = "N/A";

/// A task completed in Todoist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    /// Todoist task ID
    pub task_id: String,

    /// Task title as written by the user
    pub content: String,

    /// Project the task belongs to
    pub project_id: Option<String>,

    /// When the task was completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletedTask {
    /// Creates a task with only an ID and content.
    pub fn new(task_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            content: content.into(),
            project_id: None,
            completed_at: None,
        }
    }
}

/// A Todoist project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    pub id: String,

    /// Display name
    pub name: String,
}

impl Project {
    /// Creates a project.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Text written into a day's cell: task contents joined by `"; "`, or
/// `N/A` when the day has none.
pub fn format_task_cell(tasks: &[CompletedTask]) -> String {
    if tasks.is_empty() {
        return EMPTY_DAY_MARKER.to_string();
    }
    tasks
        .iter()
        .map(|task| task.content.as_str())
        .collect::<Vec<_>>()
        .join(TASK_SEPARATOR)
}
