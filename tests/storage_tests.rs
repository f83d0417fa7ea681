//! Behaviour shared by both storage backends.

use rworklog::db::SqliteStore;
use rworklog::models::LogRecord;
use rworklog::storage::{JsonStore, LogStore, SettingsStore};
use std::sync::Arc;

mod common;
use common::{at, day};

fn backends(dir: &std::path::Path) -> Vec<(&'static str, Arc<dyn LogStore>)> {
    vec![
        ("json", Arc::new(JsonStore::open(&dir.join("json")).unwrap())),
        (
            "sqlite",
            Arc::new(SqliteStore::open(&dir.join("logs.sqlite")).unwrap()),
        ),
    ]
}

#[test]
fn test_insert_then_list_returns_same_record() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(dir.path()) {
        let d = day(2025, 10, 1);
        let rec = LogRecord::new(at(d, 9, 0), at(d, 10, 0), "design review");
        store.insert(d, &rec).unwrap();

        assert_eq!(store.list_by_date(d).unwrap(), vec![rec], "{name}");
    }
}

#[test]
fn test_bucket_created_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(dir.path()) {
        let d = day(2025, 10, 2);
        assert!(store.bucket_for(d).unwrap().is_none(), "{name}");

        let first = store.get_or_create_bucket(d).unwrap();
        let again = store.get_or_create_bucket(d).unwrap();
        assert!(first.created, "{name}");
        assert!(!again.created, "{name}");
        assert_eq!(first.id, again.id, "{name}");

        let rec = LogRecord::new(at(d, 9, 0), at(d, 9, 30), "x");
        store.insert(d, &rec).unwrap();
        assert_eq!(store.list_by_date(d).unwrap().len(), 1, "{name}");
    }
}

#[test]
fn test_update_unknown_id_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(dir.path()) {
        let d = day(2025, 10, 3);
        store
            .insert(d, &LogRecord::new(at(d, 9, 0), at(d, 10, 0), "a"))
            .unwrap();
        let before = store.list_by_date(d).unwrap();

        let stranger = LogRecord::new(at(d, 9, 0), at(d, 12, 0), "b");
        assert!(!store.update_end_time(&stranger).unwrap(), "{name}");
        assert_eq!(store.list_by_date(d).unwrap(), before, "{name}");
    }
}

#[test]
fn test_update_resolves_by_start_date() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(dir.path()) {
        let monday = day(2025, 10, 6);
        let tuesday = day(2025, 10, 7);

        // interval crossing midnight lands in the bucket of its end
        let rec = LogRecord::new(at(monday, 23, 0), at(tuesday, 0, 30), "deploy");
        store.insert(tuesday, &rec).unwrap();

        let mut extended = rec.clone();
        extended.end_time = at(tuesday, 1, 0);
        assert!(!store.update_end_time(&extended).unwrap(), "{name}");
        assert_eq!(store.list_by_date(tuesday).unwrap(), vec![rec], "{name}");
    }
}

#[test]
fn test_delete_twice_and_unknown_date() {
    let dir = tempfile::tempdir().unwrap();
    for (name, store) in backends(dir.path()) {
        let d = day(2025, 10, 4);
        store
            .insert(d, &LogRecord::new(at(d, 9, 0), at(d, 10, 0), "a"))
            .unwrap();
        let keep = day(2025, 10, 5);
        store.get_or_create_bucket(keep).unwrap();

        assert!(store.delete_by_date(d).unwrap(), "{name}");
        assert!(!store.delete_by_date(d).unwrap(), "{name}");
        assert!(!store.delete_by_date(day(2020, 1, 1)).unwrap(), "{name}");

        let dates: Vec<_> = store.list_dates_with_logs().unwrap().into_iter().collect();
        assert_eq!(dates, vec![keep], "{name}");
    }
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let d = day(2025, 10, 8);
    let rec = LogRecord::new(at(d, 9, 0), at(d, 10, 0), "persisted");

    for (_, store) in backends(dir.path()) {
        store.insert(d, &rec).unwrap();
    }

    for (name, store) in backends(dir.path()) {
        assert_eq!(store.list_by_date(d).unwrap(), vec![rec.clone()], "{name}");
    }

    let json = JsonStore::open(&dir.path().join("json")).unwrap();
    json.ensure_owner(3).unwrap();
    let reopened = JsonStore::open(&dir.path().join("json")).unwrap();
    assert_eq!(reopened.get().unwrap().user_id, 3);
}
