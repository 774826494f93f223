//! Todoist response shapes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use tasklog_core::{CompletedTask, Project};

/// IDs are strings in current API versions and integers in older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Text(String),
    Number(i64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(s) => f.write_str(s),
            WireId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireProject {
    pub id: WireId,
    pub name: String,
}

impl From<WireProject> for Project {
    fn from(p: WireProject) -> Self {
        Project::new(p.id.to_string(), p.name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletedItem {
    #[serde(default)]
    pub task_id: Option<WireId>,
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub project_id: Option<WireId>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<CompletedItem> for CompletedTask {
    fn from(item: CompletedItem) -> Self {
        CompletedTask {
            task_id: item
                .task_id
                .or(item.id)
                .map(|id| id.to_string())
                .unwrap_or_default(),
            content: item.content,
            project_id: item.project_id.map(|id| id.to_string()),
            completed_at: item.completed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletedResponse {
    #[serde(default)]
    pub items: Vec<CompletedItem>,
}
