//! Integration tests for the taskmeter store and statistics engine
//!
//! These exercise the end-to-end flow: CRUD through the store, then
//! analytics computed over the stored snapshot via the RoutineSource
//! capability.

use chrono::{Duration, NaiveDate};
use taskmeter_core::analytics::{self, StatsRange};
use taskmeter_core::types::TaskDraft;
use taskmeter_core::Store;
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_store() -> Store {
    let store = Store::open_in_memory().expect("open in-memory store");
    store.migrate().expect("migrate schema");
    store
}

// ============================================
// Store -> engine flow
// ============================================

#[test]
fn test_completion_stats_over_stored_routines() {
    let store = open_store();
    let today = day(2026, 8, 6);

    let run = store.add_routine("Morning run", "").unwrap();
    let read = store.add_routine("Read 20 pages", "").unwrap();

    // Both completed yesterday and the day before; only one today so far
    for offset in [1, 2] {
        let d = today - Duration::days(offset);
        store.record_completion(&run.id, d).unwrap();
        store.record_completion(&read.id, d).unwrap();
    }
    store.record_completion(&run.id, today).unwrap();

    let stats = analytics::completion_stats(&store, StatsRange::Week, today).unwrap();

    assert_eq!(stats.possible_completions, 14);
    assert_eq!(stats.total_completions, 5);
    assert_eq!(stats.completion_rate, 36); // 5/14 = 35.7...
    // Today is incomplete and skipped; the two full days before count
    assert_eq!(stats.streak, 2);
    assert_eq!(stats.longest_streak, 2);

    let best = stats.best_day.expect("best day");
    assert_eq!(best.completed, 2);
    assert_eq!(best.date, today - Duration::days(2));
}

#[test]
fn test_longest_streak_reaches_outside_requested_range() {
    let store = open_store();
    let today = day(2026, 8, 6);

    let routine = store.add_routine("Stretch", "").unwrap();
    // A 12-day run finishing two months ago
    let start = day(2026, 5, 1);
    for i in 0..12 {
        store
            .record_completion(&routine.id, start + Duration::days(i))
            .unwrap();
    }

    let stats = analytics::completion_stats(&store, StatsRange::Week, today).unwrap();
    assert_eq!(stats.streak, 0);
    assert_eq!(stats.longest_streak, 12);
}

#[test]
fn test_heatmap_over_stored_routines() {
    let store = open_store();
    let today = day(2026, 8, 6);

    let a = store.add_routine("A", "").unwrap();
    let b = store.add_routine("B", "").unwrap();
    store.record_completion(&a.id, today).unwrap();
    store.record_completion(&b.id, today).unwrap();
    store
        .record_completion(&a.id, today - Duration::days(1))
        .unwrap();

    let cells = analytics::heatmap_data(&store, today).unwrap();
    assert_eq!(cells.len(), 365);

    let today_cell = cells.last().unwrap();
    assert_eq!(today_cell.count, 2);
    assert_eq!(today_cell.intensity, 4);

    let yesterday_cell = &cells[363];
    assert_eq!(yesterday_cell.count, 1);
    assert_eq!(yesterday_cell.intensity, 2);
}

#[test]
fn test_comparison_over_stored_routines() {
    let store = open_store();
    let today = day(2026, 8, 6);

    let routine = store.add_routine("Journal", "").unwrap();
    // Previous week fully completed, current week untouched
    for offset in 7..14 {
        store
            .record_completion(&routine.id, today - Duration::days(offset))
            .unwrap();
    }

    let cmp = analytics::comparison_stats(&store, StatsRange::Week, today).unwrap();
    assert_eq!(cmp.previous.total, 7);
    assert_eq!(cmp.previous.rate, 100);
    assert_eq!(cmp.current.total, 0);
    assert_eq!(cmp.diff.total, -7);
    assert_eq!(cmp.diff.rate, -100);
}

#[test]
fn test_deleting_a_routine_changes_history_scope() {
    let store = open_store();
    let today = day(2026, 8, 6);

    let keeper = store.add_routine("Keeper", "").unwrap();
    let flaky = store.add_routine("Flaky", "").unwrap();

    // Keeper completed three days running; flaky never - so no day is fully
    // completed while both exist.
    for offset in 0..3 {
        store
            .record_completion(&keeper.id, today - Duration::days(offset))
            .unwrap();
    }

    let before = analytics::completion_stats(&store, StatsRange::Week, today).unwrap();
    assert_eq!(before.longest_streak, 0);

    // Dropping the flaky routine retroactively makes those days full
    store.delete_routine(&flaky.id).unwrap();
    let after = analytics::completion_stats(&store, StatsRange::Week, today).unwrap();
    assert_eq!(after.longest_streak, 3);
}

// ============================================
// Persistence
// ============================================

#[test]
fn test_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("tasks.db");
    let today = day(2026, 8, 6);

    let routine_id = {
        let store = Store::open(&db_path).unwrap();
        store.migrate().unwrap();
        store
            .add_task(TaskDraft {
                title: "File taxes".to_string(),
                ..Default::default()
            })
            .unwrap();
        let routine = store.add_routine("Meditate", "").unwrap();
        store.toggle_routine(&routine.id, today).unwrap();
        routine.id
    };

    let store = Store::open(&db_path).unwrap();
    store.migrate().unwrap();

    let tasks = store.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "File taxes");

    let routine = store.get_routine(&routine_id).unwrap().expect("routine");
    assert_eq!(routine.last_completed, Some(today));
    assert_eq!(routine.history, vec![today]);
}
