//! The backfill walk over recent days.

use chrono::NaiveDate;
use std::sync::Arc;

use tasklog_core::{
    CellRef, DayWindow, Error, Result, SheetStore, TabName, TaskSource, column_index,
    find_date_row, format_task_cell,
};

use crate::report::{DayOutcome, StopReason, SyncReport};

/// Days examined per run unless configured otherwise.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Column that receives the task list unless configured otherwise.
pub const DEFAULT_TARGET_COLUMN: &str = "E";

/// Settings for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Name of the Todoist project whose tasks are copied
    pub project_name: String,

    /// How many days before "today" to examine, newest first
    pub lookback_days: u32,

    /// Column letters of the cell that receives the tasks
    pub target_column: String,

    /// Report what would be written without writing
    pub dry_run: bool,
}

impl SyncOptions {
    /// Options with defaults for `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            dry_run: false,
        }
    }

    /// Sets the number of days to examine.
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Sets the target column.
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Copies completed tasks into the journal sheet, one cell per day.
///
/// Days are walked from yesterday backwards. The walk stops at the first
/// day whose target cell is already filled, since everything older was
/// written by an earlier run.
#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn TaskSource>,
    store: Arc<dyn SheetStore>,
    options: SyncOptions,
}

impl SyncEngine {
    /// Creates an engine over `source` and `store`.
    pub fn new(
        source: Arc<dyn TaskSource>,
        store: Arc<dyn SheetStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            store,
            options,
        }
    }

    /// The options this engine runs with.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Runs the backfill with `today` as the reference date.
    ///
    /// An invalid target column is rejected before anything is read. Any API
    /// error aborts the run; cells written before the error stay written.
    pub async fn run(&self, today: NaiveDate) -> Result<SyncReport> {
        tracing::info!(
            project = %self.options.project_name,
            lookback_days = self.options.lookback_days,
            dry_run = self.options.dry_run,
            %today,
            "Starting sync"
        );

        let column = &self.options.target_column;
        if column_index(column).is_none() {
            return Err(Error::validation_field(
                "target_column",
                format!("'{column}' is not a column letter"),
            ));
        }

        let project_id = self
            .source
            .resolve_project(&self.options.project_name)
            .await?;
        tracing::debug!(project_id = %project_id, "Resolved project");

        let mut days = Vec::new();
        for days_ago in 1..=self.options.lookback_days {
            let window = DayWindow::days_ago(today, days_ago)?;
            let outcome = self.sync_day(&window, &project_id).await?;
            let filled = matches!(outcome, DayOutcome::AlreadyFilled { .. });
            days.push((window.date(), outcome));
            if filled {
                return Ok(SyncReport {
                    days,
                    stop: StopReason::ReachedFilledCell,
                });
            }
        }

        Ok(SyncReport {
            days,
            stop: StopReason::LookbackExhausted,
        })
    }

    async fn sync_day(&self, window: &DayWindow, project_id: &str) -> Result<DayOutcome> {
        let date = window.iso_date();
        tracing::info!(%date, "Checking for tasks completed on {date}");

        let tab = TabName::for_date(window.date());
        let tabs = self.store.list_tabs().await?;
        if !tabs.iter().any(|t| t == tab.as_str()) {
            tracing::info!(%tab, "Tab {tab} not found");
            return Ok(DayOutcome::TabMissing { tab });
        }

        let rows = self.store.rows(&tab).await?;
        let Some(row) = find_date_row(&rows, &date) else {
            tracing::info!(%tab, %date, "Date {date} not found in tab {tab}");
            return Ok(DayOutcome::DateMissing {
                tab,
                date: window.date(),
            });
        };

        let cell = CellRef::new(tab, &self.options.target_column, row)?;
        if let Some(value) = self.store.cell(&cell).await? {
            tracing::info!(%cell, %value, "Cell {cell} already has data");
            return Ok(DayOutcome::AlreadyFilled { cell, value });
        }

        tracing::info!(%cell, "Cell {cell} is empty, fetching tasks from Todoist");
        let tasks = self.source.completed_tasks(window, project_id).await?;
        if tasks.is_empty() {
            tracing::info!(%date, "No completed tasks found for {date}");
        }
        for task in &tasks {
            tracing::info!(%date, task = %task.content, "Completed task");
        }
        let value = format_task_cell(&tasks);
        let task_count = tasks.len();

        if self.options.dry_run {
            tracing::info!(%cell, %value, "Dry run, not inserting into {cell}");
            return Ok(DayOutcome::DryRun {
                cell,
                value,
                task_count,
            });
        }

        tracing::info!(%cell, %value, "Inserting into {cell}");
        self.store.write_cell(&cell, &value).await?;
        Ok(DayOutcome::Written {
            cell,
            value,
            task_count,
        })
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tasklog_core::mock::{MockSheetStore, MockTaskSource};
    use tasklog_core::SheetRows;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A March 2025 tab with one row per day, E filled where `filled` says.
    fn march_rows(filled: &[u32]) -> SheetRows {
        let header = ["Date", "Mood", "Sleep", "Notes", "Tasks"];
        let mut rows = vec![header.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
        for day in 1..=31 {
            let mut row = vec![format!("2025-03-{day:02}")];
            if filled.contains(&day) {
                row.extend(["".into(), "".into(), "".into(), format!("old {day}")]);
            }
            rows.push(row);
        }
        rows
    }

    fn engine(
        source: MockTaskSource,
        store: Arc<MockSheetStore>,
        options: SyncOptions,
    ) -> SyncEngine {
        SyncEngine::new(Arc::new(source), store, options)
    }

    #[test]
    fn test_default_options() {
        let options = SyncOptions::new("Journal");
        assert_eq!(options.lookback_days, 7);
        assert_eq!(options.target_column, "E");
        assert!(!options.dry_run);
    }

    #[tokio::test]
    async fn test_zero_lookback_does_nothing() {
        let store = Arc::new(MockSheetStore::new().with_tab("Mar-25", march_rows(&[])));
        let source = MockTaskSource::new().with_project("1", "Journal");
        let engine = engine(
            source,
            store.clone(),
            SyncOptions::new("Journal").with_lookback_days(0),
        );

        let report = engine.run(date(2025, 3, 15)).await.unwrap();
        assert!(report.days.is_empty());
        assert_eq!(report.stop, StopReason::LookbackExhausted);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project_aborts_before_reading_sheet() {
        let store = Arc::new(MockSheetStore::new());
        let engine = engine(MockTaskSource::new(), store, SyncOptions::new("Journal"));

        let err = engine.run(date(2025, 3, 15)).await.unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_target_column_is_rejected() {
        let store = Arc::new(MockSheetStore::new().with_tab("Mar-25", march_rows(&[])));
        let source = MockTaskSource::new().with_project("1", "Journal");
        let engine = engine(
            source,
            store,
            SyncOptions::new("Journal").with_target_column("5"),
        );

        let err = engine.run(date(2025, 3, 15)).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_target_column_is_rejected_without_matching_rows() {
        // No project and no tabs: only the column check can fail.
        let store = Arc::new(MockSheetStore::new());
        let engine = engine(
            MockTaskSource::new(),
            store.clone(),
            SyncOptions::new("Journal").with_target_column("E1"),
        );

        let err = engine.run(date(2025, 3, 15)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { field: Some(ref f), .. } if f == "target_column"
        ));
        assert!(store.writes().is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_overwrites_and_stops_at_first_filled(
            filled in proptest::collection::vec(1u32..=20, 0..5),
            lookback in 0u32..10,
        ) {
            let today = date(2025, 3, 21);
            let store = Arc::new(MockSheetStore::new().with_tab("Mar-25", march_rows(&filled)));
            let source = MockTaskSource::new().with_project("1", "Journal");
            let engine = engine(
                source,
                store.clone(),
                SyncOptions::new("Journal").with_lookback_days(lookback),
            );

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let report = runtime.block_on(engine.run(today)).unwrap();

            // Newest first, one day apart, nothing beyond the lookback.
            prop_assert!(report.days.len() <= lookback as usize);
            for (i, (day, _)) in report.days.iter().enumerate() {
                prop_assert_eq!(*day, date(2025, 3, 20 - i as u32));
            }

            // Filled cells are never written, and only the last day may be filled.
            let written: Vec<String> = store.writes().into_iter().map(|(cell, _)| cell).collect();
            for day in &filled {
                let cell = format!("Mar-25!E{}", day + 1);
                prop_assert!(!written.contains(&cell));
            }
            let filled_positions: Vec<usize> = report
                .days
                .iter()
                .enumerate()
                .filter(|(_, (_, o))| matches!(o, DayOutcome::AlreadyFilled { .. }))
                .map(|(i, _)| i)
                .collect();
            match report.stop {
                StopReason::ReachedFilledCell => {
                    prop_assert_eq!(filled_positions, vec![report.days.len() - 1]);
                }
                StopReason::LookbackExhausted => {
                    prop_assert!(filled_positions.is_empty());
                    prop_assert_eq!(report.days.len(), lookback as usize);
                }
            }
        }
    }
}
