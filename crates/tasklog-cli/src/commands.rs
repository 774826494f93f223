//! `run` and `tabs`: wiring configuration to the service clients.

use chrono::{NaiveDate, Utc};
use std::path::Path;
use std::sync::Arc;

use tasklog_core::{Result, SheetStore};
use tasklog_gcp_auth::{ServiceAccountKey, ServiceAccountTokenProvider};
use tasklog_sheets::SheetsClient;
use tasklog_sync::{SyncEngine, SyncReport};
use tasklog_todoist::TodoistClient;

use crate::cli::RunArgs;
use crate::config::TasklogConfig;

/// Builds the Todoist client from `[todoist]` settings.
pub fn todoist_client(config: &TasklogConfig) -> Result<TodoistClient> {
    TodoistClient::builder(&config.todoist.api_token)
        .rest_base_url(&config.todoist.rest_base_url)
        .sync_base_url(&config.todoist.sync_base_url)
        .task_limit(config.todoist.task_limit)
        .build()
}

/// Builds the Sheets client, loading the service-account key relative to
/// `cwd`.
pub fn sheets_client(config: &TasklogConfig, cwd: &Path) -> Result<SheetsClient> {
    let key_path = ServiceAccountKey::resolve_path(cwd, &config.sheets.service_account_file);
    tracing::debug!(path = %key_path.display(), "Loading service account key");
    let key = ServiceAccountKey::from_file(&key_path)?;
    let tokens = ServiceAccountTokenProvider::new(key)?;
    tracing::debug!(client_email = tokens.client_email(), "Using service account");

    SheetsClient::builder(&config.sheets.spreadsheet_id, Arc::new(tokens))
        .base_url(&config.sheets.base_url)
        .build()
}

/// Applies command-line overrides to the configured sync settings.
pub fn apply_run_args(config: &TasklogConfig, args: &RunArgs) -> tasklog_sync::SyncOptions {
    let mut options = config.sync_options().with_dry_run(args.dry_run);
    if let Some(days) = args.days {
        options = options.with_lookback_days(days);
    }
    options
}

/// The reference date: `--date` if given, else the current UTC date.
pub fn today(args: &RunArgs) -> NaiveDate {
    args.date.unwrap_or_else(|| Utc::now().date_naive())
}

/// Runs the backfill.
pub async fn run(config: &TasklogConfig, args: &RunArgs) -> Result<SyncReport> {
    config.validate()?;
    let cwd = std::env::current_dir()?;

    let source = todoist_client(config)?;
    let store = sheets_client(config, &cwd)?;
    let engine = SyncEngine::new(
        Arc::new(source),
        Arc::new(store),
        apply_run_args(config, args),
    );

    let report = engine.run(today(args)).await?;
    tracing::info!(
        examined = report.days.len(),
        written = report.written(),
        stop = %report.stop,
        "Sync finished"
    );
    Ok(report)
}

/// Lists the spreadsheet's tabs.
pub async fn tabs(config: &TasklogConfig) -> Result<Vec<String>> {
    config.validate_sheets()?;
    let cwd = std::env::current_dir()?;
    sheets_client(config, &cwd)?.list_tabs().await
}
