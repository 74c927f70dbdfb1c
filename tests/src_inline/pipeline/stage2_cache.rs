use std::cell::{Cell, RefCell};

use super::*;
use crate::input::snapshot::JsonSnapshotStore;
use crate::model::coords::{Coordinate, Domain};
use crate::pipeline::stage1_scan::ScanDiagnostics;

#[derive(Default)]
struct MemoryStore {
    table: RefCell<Option<AggregateTable>>,
    stores: Cell<usize>,
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<AggregateTable>, SnapshotError> {
        Ok(self.table.borrow().clone())
    }

    fn store(&self, table: &AggregateTable) -> Result<(), SnapshotError> {
        self.stores.set(self.stores.get() + 1);
        *self.table.borrow_mut() = Some(table.clone());
        Ok(())
    }

    fn invalidate(&self) -> Result<(), SnapshotError> {
        *self.table.borrow_mut() = None;
        Ok(())
    }
}

fn scanned_output() -> ScanOutput {
    let mut table = AggregateTable::initialize();
    table
        .accumulate(Coordinate::new(5, Domain::Labeled(5), 50), 3.0)
        .unwrap();
    ScanOutput {
        table,
        diagnostics: ScanDiagnostics {
            total_rows: 2,
            lost_rows: 1,
            ..ScanDiagnostics::default()
        },
        load_seconds: 0.0,
    }
}

#[test]
fn test_builds_and_stores_when_absent() {
    let store = MemoryStore::default();
    let gated = load_or_build(&store, || Ok(scanned_output())).unwrap();
    assert!(matches!(
        gated.source,
        TableSource::Scanned {
            diagnostics: ScanDiagnostics { lost_rows: 1, .. },
            ..
        }
    ));
    assert_eq!(store.stores.get(), 1);
    assert_eq!(store.table.borrow().as_ref(), Some(&gated.table));
}

#[test]
fn test_second_run_skips_scan() {
    let store = MemoryStore::default();
    let builds = Cell::new(0);
    let build = || {
        builds.set(builds.get() + 1);
        Ok(scanned_output())
    };
    let first = load_or_build(&store, build).unwrap();
    let second = load_or_build(&store, || {
        builds.set(builds.get() + 1);
        Ok(scanned_output())
    })
    .unwrap();
    assert_eq!(builds.get(), 1);
    assert_eq!(store.stores.get(), 1);
    assert!(matches!(second.source, TableSource::Snapshot));
    assert_eq!(first.table, second.table);
}

#[test]
fn test_invalidate_forces_rebuild() {
    let store = MemoryStore::default();
    load_or_build(&store, || Ok(scanned_output())).unwrap();
    store.invalidate().unwrap();
    let gated = load_or_build(&store, || Ok(scanned_output())).unwrap();
    assert!(matches!(gated.source, TableSource::Scanned { .. }));
    assert_eq!(store.stores.get(), 2);
}

#[test]
fn test_json_store_round_trip_skips_scan() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("stats.json"));
    let first = load_or_build(&store, || Ok(scanned_output())).unwrap();
    let second = load_or_build(&store, || -> Result<ScanOutput, ScanError> {
        panic!("raw scan must be skipped when a snapshot exists")
    })
    .unwrap();
    assert!(matches!(second.source, TableSource::Snapshot));
    assert_eq!(first.table, second.table);
}

#[test]
fn test_corrupt_snapshot_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonSnapshotStore::new(&path);
    let builds = Cell::new(0);
    let err = load_or_build(&store, || {
        builds.set(builds.get() + 1);
        Ok(scanned_output())
    })
    .unwrap_err();
    assert!(matches!(err, CacheError::Load(SnapshotError::Json { .. })));
    assert_eq!(builds.get(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_scan_failure_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("stats.json"));
    let err = load_or_build(&store, || {
        crate::pipeline::stage1_scan::run_scan(&dir.path().join("absent"))
    })
    .unwrap_err();
    assert!(matches!(err, CacheError::Scan(_)));
    assert!(!store.path().exists());
}
