// Whole-file upload against a SQLite store

mod common;

use common::{csv_of, stored, write_csv};
use iudsync_core::errors::SyncErrorKind;
use iudsync_core::model::IudStatus;
use iudsync_core::ops::{write_full, TableStore};
use iudsync_engine::commands::open_store;
use iudsync_engine::commands::upload::{upload, UploadMode};
use iudsync_engine::SyncConfig;
use iudsync_store::SqliteTableStore;
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteTableStore, SyncConfig) {
    let dir = TempDir::new().unwrap();
    let config = SyncConfig::default().with_db_path(dir.path().join("sample_reporting.db"));
    let store = open_store(&config).unwrap();
    (dir, store, config)
}

#[test]
fn test_scenario_a_first_load() {
    let (dir, mut store, config) = setup();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 10, 20, 30), (2, "b", 1, 2, 3)]));

    let report = upload(&mut store, &path, false, &config).unwrap();

    assert_eq!(report.mode, UploadMode::Full);
    assert!(report.first_load);
    assert_eq!(report.chunks, 1);
    assert_eq!(report.summary.inserts, 2);
    assert_eq!(
        store.read_all("main_table").unwrap(),
        stored(&[(1, "a", 10, 20, 30), (2, "b", 1, 2, 3)], IudStatus::Insert)
    );
}

#[test]
fn test_scenario_b_update_takes_new_payload() {
    let (dir, mut store, config) = setup();
    write_full(
        &mut store,
        "main_table",
        &stored(&[(1, "a", 10, 20, 30)], IudStatus::Insert),
    )
    .unwrap();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 99, 20, 30)]));

    let report = upload(&mut store, &path, false, &config).unwrap();

    assert!(!report.first_load);
    assert_eq!(
        store.read_all("main_table").unwrap(),
        stored(&[(1, "a", 99, 20, 30)], IudStatus::Update)
    );
}

#[test]
fn test_scenario_c_delete_keeps_old_payload() {
    let (dir, mut store, config) = setup();
    write_full(
        &mut store,
        "main_table",
        &stored(&[(1, "a", 10, 20, 30), (2, "b", 1, 2, 3)], IudStatus::Insert),
    )
    .unwrap();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 10, 20, 30)]));

    upload(&mut store, &path, false, &config).unwrap();

    let mut expected = stored(&[(1, "a", 10, 20, 30)], IudStatus::Update);
    expected.extend(stored(&[(2, "b", 1, 2, 3)], IudStatus::Delete));
    assert_eq!(store.read_all("main_table").unwrap(), expected);
}

#[test]
fn test_scenario_d_malformed_file_leaves_table() {
    let (dir, mut store, config) = setup();
    let before = stored(&[(1, "a", 10, 20, 30)], IudStatus::Insert);
    write_full(&mut store, "main_table", &before).unwrap();
    let path = write_csv(&dir, "in.csv", "Field1,Field3,Field4,Field5\n1,10,20,30\n");

    let err = upload(&mut store, &path, false, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::MalformedInput);
    assert_eq!(store.read_all("main_table").unwrap(), before);
}

#[test]
fn test_non_integer_payload_aborts_before_write() {
    let (dir, mut store, config) = setup();
    let before = stored(&[(1, "a", 10, 20, 30)], IudStatus::Insert);
    write_full(&mut store, "main_table", &before).unwrap();
    let path = write_csv(
        &dir,
        "in.csv",
        &format!("{}1,a,10,20,30\n2,b,1.5,2,3\n", common::HEADER),
    );

    let err = upload(&mut store, &path, false, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::TypeCoercion);
    assert_eq!(err.column(), Some("Field3"));
    assert_eq!(err.key(), Some("(2, \"b\")"));
    assert_eq!(store.read_all("main_table").unwrap(), before);
}

#[test]
fn test_absent_payload_on_first_load_is_coercion_error() {
    let (dir, mut store, config) = setup();
    let path = write_csv(&dir, "in.csv", "Field1,Field2,Field3,Field4\n1,a,1,2\n");

    let err = upload(&mut store, &path, false, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::TypeCoercion);
    assert_eq!(err.column(), Some("Field5"));
    assert!(store.read_all("main_table").unwrap().is_empty());
}

#[test]
fn test_duplicate_key_in_file_aborts() {
    let (dir, mut store, config) = setup();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 1, 1, 1), (1, "a", 2, 2, 2)]));

    let err = upload(&mut store, &path, false, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::DuplicateKey);
    assert!(store.read_all("main_table").unwrap().is_empty());
}

#[test]
fn test_whole_float_and_integer_text_accepted() {
    let (dir, mut store, config) = setup();
    let path = write_csv(&dir, "in.csv", &format!("{}1,a,2.0, 7 ,-3\n", common::HEADER));

    upload(&mut store, &path, false, &config).unwrap();

    assert_eq!(
        store.read_all("main_table").unwrap(),
        stored(&[(1, "a", 2, 7, -3)], IudStatus::Insert)
    );
}

#[test]
fn test_custom_table_name() {
    let (dir, mut store, config) = setup();
    let config = config.with_table("reporting_rows");
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 1, 1, 1)]));

    upload(&mut store, &path, false, &config).unwrap();

    assert_eq!(store.read_all("reporting_rows").unwrap().len(), 1);
    assert!(store.read_all("main_table").unwrap().is_empty());
}
