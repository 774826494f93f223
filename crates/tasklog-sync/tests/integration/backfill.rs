//! End-to-end backfills over a month of journal rows.

use tasklog_core::mock::{MockSheetStore, MockTaskSource};
use tasklog_core::{CellRef, TabName};
use tasklog_sync::{DayOutcome, StopReason, SyncOptions};

use crate::common::{PROJECT, TestHarness, date, month_rows};

fn march_first_fortnight(filled: &[(&str, &str)]) -> MockSheetStore {
    let isos: Vec<String> = (1..=14).map(|d| format!("2025-03-{d:02}")).collect();
    let entries: Vec<(&str, &str)> = isos
        .iter()
        .map(|iso| {
            let value = filled
                .iter()
                .find(|(d, _)| *d == iso.as_str())
                .map_or("", |(_, v)| *v);
            (iso.as_str(), value)
        })
        .collect();
    MockSheetStore::new().with_tab("Mar-25", month_rows(&entries))
}

#[tokio::test]
async fn test_fills_empty_days_until_filled_cell() {
    let harness = TestHarness::new(
        march_first_fortnight(&[("2025-03-10", "Pay rent")]),
        MockTaskSource::new().with_tasks(date(2025, 3, 14), &["Water plants", "Call mum"]),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 15))
        .await
        .expect("sync should succeed");

    assert_eq!(
        harness.store.writes(),
        vec![
            ("Mar-25!E15".to_string(), "Water plants; Call mum".to_string()),
            ("Mar-25!E14".to_string(), "N/A".to_string()),
            ("Mar-25!E13".to_string(), "N/A".to_string()),
            ("Mar-25!E12".to_string(), "N/A".to_string()),
        ]
    );
    assert_eq!(report.days.len(), 5);
    assert_eq!(report.written(), 4);
    assert_eq!(report.stop, StopReason::ReachedFilledCell);
    assert!(matches!(
        report.outcome_for(date(2025, 3, 10)),
        Some(DayOutcome::AlreadyFilled { value, .. }) if value == "Pay rent"
    ));
    assert_eq!(
        harness.source.queried_days(),
        vec![
            date(2025, 3, 14),
            date(2025, 3, 13),
            date(2025, 3, 12),
            date(2025, 3, 11),
        ]
    );
}

#[tokio::test]
async fn test_written_outcome_counts_tasks() {
    let harness = TestHarness::new(
        march_first_fortnight(&[("2025-03-13", "done")]),
        MockTaskSource::new().with_tasks(date(2025, 3, 14), &["a", "b", "c"]),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    let tab = TabName::from_parts("25", "03").unwrap();
    assert_eq!(
        report.outcome_for(date(2025, 3, 14)),
        Some(&DayOutcome::Written {
            cell: CellRef::new(tab, "E", 15).unwrap(),
            value: "a; b; c".to_string(),
            task_count: 3,
        })
    );
}

#[tokio::test]
async fn test_walk_crosses_into_previous_month_tab() {
    let store = MockSheetStore::new()
        .with_tab(
            "Feb-25",
            month_rows(&[
                ("2025-02-25", "old"),
                ("2025-02-26", ""),
                ("2025-02-27", ""),
                ("2025-02-28", ""),
            ]),
        )
        .with_tab("Mar-25", month_rows(&[("2025-03-01", "")]));
    let harness = TestHarness::new(
        store,
        MockTaskSource::new().with_tasks(date(2025, 2, 28), &["Submit taxes"]),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT))
        .run(date(2025, 3, 2))
        .await
        .unwrap();

    assert_eq!(
        harness.store.writes(),
        vec![
            ("Mar-25!E2".to_string(), "N/A".to_string()),
            ("Feb-25!E5".to_string(), "Submit taxes".to_string()),
            ("Feb-25!E4".to_string(), "N/A".to_string()),
            ("Feb-25!E3".to_string(), "N/A".to_string()),
        ]
    );
    assert_eq!(report.stop, StopReason::ReachedFilledCell);
}

#[tokio::test]
async fn test_missing_tab_and_row_are_skipped() {
    // 03-13 has no row; February has no tab at all.
    let store = MockSheetStore::new().with_tab(
        "Mar-25",
        month_rows(&[("2025-03-12", ""), ("2025-03-14", "")]),
    );
    let harness = TestHarness::new(store, MockTaskSource::new());

    let report = harness
        .engine(SyncOptions::new(PROJECT).with_lookback_days(3))
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    assert!(matches!(
        report.outcome_for(date(2025, 3, 13)),
        Some(DayOutcome::DateMissing { .. })
    ));
    assert_eq!(report.written(), 2);
    assert_eq!(report.stop, StopReason::LookbackExhausted);

    let harness = TestHarness::new(
        MockSheetStore::new().with_tab("Mar-25", month_rows(&[("2025-03-01", "")])),
        MockTaskSource::new(),
    );
    let report = harness
        .engine(SyncOptions::new(PROJECT).with_lookback_days(3))
        .run(date(2025, 3, 2))
        .await
        .unwrap();
    let outcomes: Vec<_> = report.days.iter().map(|(_, o)| o.clone()).collect();
    assert!(outcomes[0].is_write());
    assert_eq!(
        outcomes[1],
        DayOutcome::TabMissing {
            tab: TabName::from_parts("25", "02").unwrap()
        }
    );
    assert_eq!(outcomes.len(), 3);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let harness = TestHarness::new(
        march_first_fortnight(&[("2025-03-12", "x")]),
        MockTaskSource::new().with_tasks(date(2025, 3, 14), &["Water plants"]),
    );

    let report = harness
        .engine(SyncOptions::new(PROJECT).with_dry_run(true))
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    assert!(harness.store.writes().is_empty());
    assert_eq!(report.written(), 0);
    assert!(matches!(
        report.outcome_for(date(2025, 3, 14)),
        Some(DayOutcome::DryRun { value, task_count: 1, .. }) if value == "Water plants"
    ));
    assert_eq!(report.stop, StopReason::ReachedFilledCell);
}

#[tokio::test]
async fn test_custom_target_column() {
    let harness = TestHarness::new(
        march_first_fortnight(&[]),
        MockTaskSource::new().with_tasks(date(2025, 3, 14), &["Stretch"]),
    );

    harness
        .engine(
            SyncOptions::new(PROJECT)
                .with_lookback_days(1)
                .with_target_column("f"),
        )
        .run(date(2025, 3, 15))
        .await
        .unwrap();

    assert_eq!(
        harness.store.writes(),
        vec![("Mar-25!F15".to_string(), "Stretch".to_string())]
    );
}
