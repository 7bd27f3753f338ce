// Chunked upload: equivalence with whole-file mode and failure atomicity

mod common;

use std::collections::BTreeMap;

use common::{csv_of, sorted, stored, write_csv};
use iudsync_core::errors::SyncErrorKind;
use iudsync_core::model::IudStatus;
use iudsync_core::ops::{write_full, MemoryTableStore, TableStore};
use iudsync_engine::commands::open_store;
use iudsync_engine::commands::upload::{upload, UploadMode};
use iudsync_engine::SyncConfig;
use proptest::prelude::*;
use tempfile::TempDir;

fn seeded(rows: &[(i64, &str, i64, i64, i64)]) -> MemoryTableStore {
    let mut store = MemoryTableStore::new();
    write_full(&mut store, "main_table", &stored(rows, IudStatus::Insert)).unwrap();
    store
}

#[test]
fn test_chunked_matches_full_with_deletes() {
    let dir = TempDir::new().unwrap();
    let old = [(1, "a", 1, 1, 1), (2, "b", 2, 2, 2), (3, "c", 3, 3, 3)];
    let path = write_csv(
        &dir,
        "in.csv",
        &csv_of(&[(3, "c", 30, 30, 30), (4, "d", 4, 4, 4), (1, "a", 10, 10, 10)]),
    );
    let config = SyncConfig::default().with_chunk_size(2);

    let mut full = seeded(&old);
    let mut chunked = seeded(&old);
    let full_report = upload(&mut full, &path, false, &config).unwrap();
    let chunked_report = upload(&mut chunked, &path, true, &config).unwrap();

    assert_eq!(chunked_report.mode, UploadMode::Chunked);
    assert_eq!(chunked_report.chunks, 2);
    assert_eq!(full_report.summary, chunked_report.summary);
    assert_eq!(
        sorted(full.read_all("main_table").unwrap()),
        sorted(chunked.read_all("main_table").unwrap())
    );
    assert_eq!(chunked.table_names(), vec!["main_table".to_string()]);
}

#[test]
fn test_keep_missing_carries_unseen_rows_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 10, 10, 10)]));
    let config = SyncConfig::default().with_detect_deletes(false);
    let mut store = seeded(&[(1, "a", 1, 1, 1), (2, "b", 2, 2, 2)]);

    let report = upload(&mut store, &path, true, &config).unwrap();

    assert_eq!(report.summary.deletes, 0);
    let mut expected = stored(&[(1, "a", 10, 10, 10)], IudStatus::Update);
    expected.extend(stored(&[(2, "b", 2, 2, 2)], IudStatus::Insert));
    assert_eq!(store.read_all("main_table").unwrap(), expected);
}

#[test]
fn test_key_repeated_across_chunks_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "in.csv",
        &csv_of(&[(1, "a", 1, 1, 1), (2, "b", 2, 2, 2), (1, "a", 3, 3, 3)]),
    );
    let config = SyncConfig::default().with_chunk_size(2);
    let before = stored(&[(9, "z", 9, 9, 9)], IudStatus::Insert);
    let mut store = seeded(&[(9, "z", 9, 9, 9)]);

    let err = upload(&mut store, &path, true, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::DuplicateKey);
    assert_eq!(err.chunk(), Some(1));
    assert_eq!(store.read_all("main_table").unwrap(), before);
    assert_eq!(store.table_names(), vec!["main_table".to_string()]);
}

#[test]
fn test_failed_write_leaves_table_and_no_staging() {
    let dir = TempDir::new().unwrap();
    let rows = [(1, "a", 1, 1, 1), (2, "b", 2, 2, 2), (3, "c", 3, 3, 3), (4, "d", 4, 4, 4)];
    let path = write_csv(&dir, "in.csv", &csv_of(&rows));
    let config = SyncConfig::default().with_chunk_size(1);
    let before = stored(&[(1, "a", 0, 0, 0)], IudStatus::Insert);
    // the seed is write 1; chunks 0 and 1 succeed, chunk 2 fails
    let mut store = seeded(&[(1, "a", 0, 0, 0)]).fail_writes_after(3);

    let err = upload(&mut store, &path, true, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::StoreUnavailable);
    assert_eq!(err.chunk(), Some(2));
    assert_eq!(store.read_all("main_table").unwrap(), before);
    assert_eq!(store.table_names(), vec!["main_table".to_string()]);
}

#[test]
fn test_coercion_failure_in_later_chunk_rolls_back_sqlite() {
    let dir = TempDir::new().unwrap();
    let config = SyncConfig::default()
        .with_db_path(dir.path().join("sample_reporting.db"))
        .with_chunk_size(1);
    let mut store = open_store(&config).unwrap();
    let before = stored(&[(5, "e", 5, 5, 5)], IudStatus::Insert);
    write_full(&mut store, "main_table", &before).unwrap();
    let path = write_csv(
        &dir,
        "in.csv",
        &format!("{}1,a,1,1,1\n2,b,oops,2,2\n", common::HEADER),
    );

    let err = upload(&mut store, &path, true, &config).unwrap_err();

    assert_eq!(err.kind(), SyncErrorKind::TypeCoercion);
    assert_eq!(err.chunk(), Some(1));
    assert_eq!(store.read_all("main_table").unwrap(), before);
    assert!(!store.table_exists("main_table_staging").unwrap());
}

#[test]
fn test_leftover_staging_is_reset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "in.csv", &csv_of(&[(1, "a", 1, 1, 1)]));
    let mut store = MemoryTableStore::new();
    store
        .append_rows("main_table_staging", &stored(&[(7, "g", 7, 7, 7)], IudStatus::Insert))
        .unwrap();

    let report = upload(&mut store, &path, true, &SyncConfig::default()).unwrap();

    assert!(report.first_load);
    assert_eq!(
        store.read_all("main_table").unwrap(),
        stored(&[(1, "a", 1, 1, 1)], IudStatus::Insert)
    );
}

#[test]
fn test_empty_input_deletes_everything_in_chunked_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "in.csv", common::HEADER);
    let mut store = seeded(&[(1, "a", 1, 1, 1), (2, "b", 2, 2, 2)]);

    let report = upload(&mut store, &path, true, &SyncConfig::default().with_chunk_size(1)).unwrap();

    assert_eq!(report.chunks, 0);
    assert_eq!(report.summary.deletes, 2);
    assert!(store
        .read_all("main_table")
        .unwrap()
        .iter()
        .all(|r| r.status == IudStatus::Delete));
}

fn arb_rows() -> impl Strategy<Value = Vec<(i64, String, i64, i64, i64)>> {
    prop::collection::btree_map((0i64..12, prop::sample::select(vec!["a", "b"])), (0i64..100, 0i64..100, 0i64..100), 0..16)
        .prop_map(|rows: BTreeMap<(i64, &str), (i64, i64, i64)>| {
            rows.into_iter()
                .map(|((f1, f2), (f3, f4, f5))| (f1, f2.to_string(), f3, f4, f5))
                .collect()
        })
}

fn as_refs(rows: &[(i64, String, i64, i64, i64)]) -> Vec<(i64, &str, i64, i64, i64)> {
    rows.iter()
        .map(|(f1, f2, f3, f4, f5)| (*f1, f2.as_str(), *f3, *f4, *f5))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_chunked_equals_full(
        old in arb_rows(),
        mut new in arb_rows(),
        chunk_size in 1usize..6,
        shuffle_seed in any::<u64>(),
    ) {
        // file order should not matter
        new.sort_by_key(|(f1, f2, ..)| (f1.wrapping_mul(shuffle_seed as i64 | 1), f2.clone()));

        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "in.csv", &csv_of(&as_refs(&new)));
        let config = SyncConfig::default().with_chunk_size(chunk_size);

        let mut full = seeded(&as_refs(&old));
        let mut chunked = seeded(&as_refs(&old));
        let full_report = upload(&mut full, &path, false, &config).unwrap();
        let chunked_report = upload(&mut chunked, &path, true, &config).unwrap();

        prop_assert_eq!(full_report.summary, chunked_report.summary);
        prop_assert_eq!(full_report.first_load, chunked_report.first_load);
        prop_assert_eq!(
            sorted(full.read_all("main_table").unwrap()),
            sorted(chunked.read_all("main_table").unwrap())
        );
    }
}
