//! Where a run stops, and what it leaves untouched.

use tasklog_core::Error;
use tasklog_core::mock::{MockSheetStore, MockTaskSource};
use tasklog_sync::{DayOutcome, StopReason, SyncOptions};

use crate::common::{PROJECT, TestHarness, date, month_rows};

fn march_rows() -> tasklog_core::SheetRows {
    month_rows(&[
        ("2025-03-08", ""),
        ("2025-03-09", ""),
        ("2025-03-10", ""),
        ("2025-03-11", ""),
        ("2025-03-12", ""),
        ("2025-03-13", ""),
        ("2025-03-14", ""),
    ])
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let harness = TestHarness::new(
        MockSheetStore::new().with_tab("Mar-25", march_rows()),
        MockTaskSource::new().with_tasks(date(2025, 3, 14), &["Water plants"]),
    );
    let engine = harness.engine(SyncOptions::new(PROJECT));

    let first = engine.run(date(2025, 3, 15)).await.unwrap();
    assert_eq!(first.written(), 7);
    assert_eq!(first.stop, StopReason::LookbackExhausted);

    let second = engine.run(date(2025, 3, 15)).await.unwrap();
    assert_eq!(second.written(), 0);
    assert_eq!(second.days.len(), 1);
    assert_eq!(second.stop, StopReason::ReachedFilledCell);
    assert_eq!(harness.store.writes().len(), 7);
}

#[tokio::test]
async fn test_next_day_run_fills_only_the_new_day() {
    let harness = TestHarness::new(
        MockSheetStore::new().with_tab(
            "Mar-25",
            month_rows(&[("2025-03-13", "done"), ("2025-03-14", "")]),
        ),
        MockTaskSource::new(),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    assert_eq!(
        harness.store.writes(),
        vec![("Mar-25!E3".to_string(), "N/A".to_string())]
    );
    assert_eq!(report.days.len(), 2);
}

#[tokio::test]
async fn test_nothing_older_than_filled_cell_is_read() {
    let harness = TestHarness::new(
        MockSheetStore::new().with_tab(
            "Mar-25",
            month_rows(&[("2025-03-12", ""), ("2025-03-13", ""), ("2025-03-14", "kept")]),
        ),
        MockTaskSource::new(),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    assert!(harness.store.writes().is_empty());
    assert!(harness.source.queried_days().is_empty());
    assert_eq!(report.days.len(), 1);
    assert!(matches!(
        &report.days[0].1,
        DayOutcome::AlreadyFilled { value, .. } if value == "kept"
    ));
}

#[tokio::test]
async fn test_write_failure_aborts_run() {
    let harness = TestHarness::new(
        MockSheetStore::new()
            .with_tab("Mar-25", march_rows())
            .with_failing_writes(),
        MockTaskSource::new(),
    );

    let err = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 15))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 500, .. }));
    assert_eq!(harness.source.queried_days(), vec![date(2025, 3, 14)]);
}

#[tokio::test]
async fn test_unknown_project_aborts_run() {
    let harness = TestHarness::new(
        MockSheetStore::new().with_tab("Mar-25", march_rows()),
        MockTaskSource::new(),
    );

    let err = harness
        .engine(SyncOptions::new("Groceries"))
        .run(date(2025, 3, 15))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProjectNotFound { ref name } if name == "Groceries"));
    assert!(harness.store.writes().is_empty());
}
