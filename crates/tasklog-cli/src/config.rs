//! Layered configuration: defaults, TOML file, `.env`, environment.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use tasklog_core::{Error, Result};
use tasklog_sync::{DEFAULT_LOOKBACK_DAYS, DEFAULT_TARGET_COLUMN, SyncOptions};
use tasklog_todoist::{DEFAULT_REST_BASE_URL, DEFAULT_SYNC_BASE_URL, DEFAULT_TASK_LIMIT};

/// Name used for the config directory and in user-facing hints.
pub const PROJECT_NAME: &str = "tasklog";

/// Todoist API token.
pub const ENV_TODOIST_API_TOKEN: &str = "TODOIST_API_TOKEN";
/// Name of the Todoist project to copy from.
pub const ENV_TODOIST_PROJECT_NAME: &str = "TODOIST_PROJECT_NAME";
/// Spreadsheet ID of the journal.
pub const ENV_GOOGLE_SHEET_ID: &str = "GOOGLE_SHEET_ID";
/// Service-account key file, relative to the working directory.
pub const ENV_SERVICE_ACCOUNT_FILE: &str = "SERVICE_ACCOUNT_FILE";
/// Days examined per run.
pub const ENV_LOOKBACK_DAYS: &str = "TASKLOG_LOOKBACK_DAYS";
/// Column receiving the task list.
pub const ENV_TARGET_COLUMN: &str = "TASKLOG_TARGET_COLUMN";
/// Maximum completed tasks fetched per day.
pub const ENV_TASK_LIMIT: &str = "TASKLOG_TASK_LIMIT";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TasklogConfig {
    /// Todoist settings
    pub todoist: TodoistConfig,

    /// Google Sheets settings
    pub sheets: SheetsConfig,

    /// Backfill settings
    pub sync: SyncConfig,
}

/// `[todoist]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoistConfig {
    /// API token (required)
    pub api_token: String,

    /// Project whose completed tasks are copied (required)
    pub project_name: String,

    /// Maximum tasks requested per day
    pub task_limit: u32,

    /// REST API root
    pub rest_base_url: String,

    /// Sync API root
    pub sync_base_url: String,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            project_name: String::new(),
            task_limit: DEFAULT_TASK_LIMIT,
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            sync_base_url: DEFAULT_SYNC_BASE_URL.to_string(),
        }
    }
}

/// `[sheets]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Spreadsheet ID (required)
    pub spreadsheet_id: String,

    /// Path of the service-account key; relative paths are resolved
    /// against the working directory (required)
    pub service_account_file: String,

    /// Column letters of the cell receiving the tasks
    pub target_column: String,

    /// Spreadsheets collection URL
    pub base_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            service_account_file: String::new(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            base_url: tasklog_sheets::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Days examined per run, newest first
    pub lookback_days: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl TasklogConfig {
    /// Default config file location, `<config_dir>/tasklog/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// The explicit path if given, else the default location.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// Loads the config file (if any) and applies environment overrides.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parses TOML text; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Serializes the config as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Overrides settings from environment variables found by `lookup`.
    ///
    /// Unset and empty variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_TODOIST_API_TOKEN) {
            self.todoist.api_token = v;
        }
        if let Some(v) = get(ENV_TODOIST_PROJECT_NAME) {
            self.todoist.project_name = v;
        }
        if let Some(v) = get(ENV_GOOGLE_SHEET_ID) {
            self.sheets.spreadsheet_id = v;
        }
        if let Some(v) = get(ENV_SERVICE_ACCOUNT_FILE) {
            self.sheets.service_account_file = v;
        }
        if let Some(v) = get(ENV_TARGET_COLUMN) {
            self.sheets.target_column = v;
        }
        if let Some(v) = get(ENV_LOOKBACK_DAYS) {
            self.sync.lookback_days = parse_number(ENV_LOOKBACK_DAYS, &v)?;
        }
        if let Some(v) = get(ENV_TASK_LIMIT) {
            self.todoist.task_limit = parse_number(ENV_TASK_LIMIT, &v)?;
        }
        Ok(())
    }

    /// Required settings that are empty, as `(key, env var)` pairs.
    pub fn missing_required(&self) -> Vec<(&'static str, &'static str)> {
        [
            ("todoist.api_token", ENV_TODOIST_API_TOKEN, &self.todoist.api_token),
            (
                "todoist.project_name",
                ENV_TODOIST_PROJECT_NAME,
                &self.todoist.project_name,
            ),
            ("sheets.spreadsheet_id", ENV_GOOGLE_SHEET_ID, &self.sheets.spreadsheet_id),
            (
                "sheets.service_account_file",
                ENV_SERVICE_ACCOUNT_FILE,
                &self.sheets.service_account_file,
            ),
        ]
        .into_iter()
        .filter(|(_, _, value)| value.trim().is_empty())
        .map(|(key, env, _)| (key, env))
        .collect()
    }

    /// Checks that everything a sync run needs is set.
    pub fn validate(&self) -> Result<()> {
        report_missing(self.missing_required())
    }

    /// Checks only the settings needed to read the spreadsheet.
    pub fn validate_sheets(&self) -> Result<()> {
        report_missing(
            self.missing_required()
                .into_iter()
                .filter(|(key, _)| key.starts_with("sheets."))
                .collect(),
        )
    }

    /// Sync options from this config.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions::new(&self.todoist.project_name)
            .with_lookback_days(self.sync.lookback_days)
            .with_target_column(&self.sheets.target_column)
    }

    /// The settings as environment variable assignments, empty values
    /// skipped.
    pub fn to_env_vars(&self) -> Vec<(String, String)> {
        [
            (ENV_TODOIST_API_TOKEN, self.todoist.api_token.clone()),
            (ENV_TODOIST_PROJECT_NAME, self.todoist.project_name.clone()),
            (ENV_GOOGLE_SHEET_ID, self.sheets.spreadsheet_id.clone()),
            (
                ENV_SERVICE_ACCOUNT_FILE,
                self.sheets.service_account_file.clone(),
            ),
            (ENV_TARGET_COLUMN, self.sheets.target_column.clone()),
            (ENV_LOOKBACK_DAYS, self.sync.lookback_days.to_string()),
            (ENV_TASK_LIMIT, self.todoist.task_limit.to_string()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| {
        Error::validation_field(key, format!("'{value}' is not a non-negative integer"))
    })
}

fn report_missing(missing: Vec<(&'static str, &'static str)>) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }
    let list = missing
        .iter()
        .map(|(key, env)| format!("{key} ({env})"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::config(format!("missing required settings: {list}")))
}

/// Loads `KEY=value` lines from `path` into the process environment.
///
/// Variables already set are not overridden. Returns `false` when the
/// file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::config(format!(
            "Failed to load {}: {e}",
            path.display()
        ))),
    }
}
