// Integration tests for SqliteTableStore against a database file

use iudsync_core::errors::SyncErrorKind;
use iudsync_core::model::{ChangeRecord, IudStatus, RecordKey};
use iudsync_core::ops::{load_existing, write_append, write_full, TableStore};
use iudsync_core::reconcile::reconcile;
use iudsync_store::SqliteTableStore;
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteTableStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteTableStore::open(dir.path().join("sample_reporting.db")).unwrap();
    (dir, store)
}

fn row(field1: i64, field2: &str, status: IudStatus) -> ChangeRecord {
    ChangeRecord::new(RecordKey::new(field1, field2), field1 * 10, 0, -1, status)
}

#[test]
fn test_rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample_reporting.db");
    let rows = vec![row(1, "a", IudStatus::Insert), row(2, "b", IudStatus::Delete)];

    {
        let mut store = SqliteTableStore::open(&path).unwrap();
        write_full(&mut store, "main_table", &rows).unwrap();
    }

    let store = SqliteTableStore::open(&path).unwrap();
    assert_eq!(store.read_all("main_table").unwrap(), rows);
}

#[test]
fn test_write_full_replaces_and_append_keeps() {
    let (_dir, mut store) = setup();

    write_full(&mut store, "main_table", &[row(1, "a", IudStatus::Insert)]).unwrap();
    write_full(&mut store, "main_table", &[row(2, "b", IudStatus::Insert)]).unwrap();
    write_append(&mut store, "main_table", &[row(3, "c", IudStatus::Insert)]).unwrap();

    assert_eq!(
        store.read_all("main_table").unwrap(),
        vec![row(2, "b", IudStatus::Insert), row(3, "c", IudStatus::Insert)]
    );
}

#[test]
fn test_append_creates_missing_table() {
    let (_dir, mut store) = setup();

    store
        .append_rows("main_table_staging", &[row(1, "a", IudStatus::Update)])
        .unwrap();

    assert!(store.table_exists("main_table_staging").unwrap());
    assert_eq!(store.read_all("main_table_staging").unwrap().len(), 1);
}

#[test]
fn test_promote_swaps_staging_into_place() {
    let (_dir, mut store) = setup();
    write_full(&mut store, "main_table", &[row(9, "z", IudStatus::Insert)]).unwrap();
    store
        .append_rows(
            "main_table_staging",
            &[row(1, "a", IudStatus::Insert), row(2, "b", IudStatus::Update)],
        )
        .unwrap();

    store.promote("main_table_staging", "main_table").unwrap();

    assert_eq!(
        store.read_all("main_table").unwrap(),
        vec![row(1, "a", IudStatus::Insert), row(2, "b", IudStatus::Update)]
    );
    assert!(!store.table_exists("main_table_staging").unwrap());
}

#[test]
fn test_drop_table_is_idempotent() {
    let (_dir, mut store) = setup();
    store
        .append_rows("scratch", &[row(1, "a", IudStatus::Insert)])
        .unwrap();

    store.drop_table("scratch").unwrap();
    store.drop_table("scratch").unwrap();

    assert!(!store.table_exists("scratch").unwrap());
}

#[test]
fn test_invalid_table_name_rejected() {
    let (_dir, mut store) = setup();

    let err = store.append_rows("main_table; DROP TABLE x", &[]).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::InvalidInput);
}

#[test]
fn test_reconcile_round_trip_through_sqlite() {
    let (_dir, mut store) = setup();
    write_full(
        &mut store,
        "main_table",
        &[row(1, "a", IudStatus::Insert), row(2, "b", IudStatus::Insert)],
    )
    .unwrap();

    let old = load_existing(&store, "main_table").unwrap();
    let new = [row(2, "b", IudStatus::Insert), row(3, "c", IudStatus::Insert)]
        .iter()
        .map(ChangeRecord::to_record)
        .collect();
    let changes = reconcile(&old, &new).unwrap();
    write_full(&mut store, "main_table", &changes).unwrap();

    let statuses: Vec<(i64, IudStatus)> = store
        .read_all("main_table")
        .unwrap()
        .into_iter()
        .map(|r| (r.key.field1, r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (3, IudStatus::Insert),
            (2, IudStatus::Update),
            (1, IudStatus::Delete)
        ]
    );
}

#[test]
fn test_open_unwritable_path_is_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = SqliteTableStore::open(dir.path().join("missing").join("db.sqlite"))
        .err()
        .unwrap();
    assert_eq!(err.kind(), SyncErrorKind::StoreUnavailable);
}
