use tracing::info;

use crate::input::snapshot::{SnapshotError, SnapshotStore};
use crate::model::stats::AggregateTable;
use crate::pipeline::stage1_scan::{ScanDiagnostics, ScanError, ScanOutput};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("{0} (delete it or re-run with --rebuild)")]
    Load(#[source] SnapshotError),
    #[error("failed to persist table: {0}")]
    Store(#[source] SnapshotError),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

#[derive(Debug, Clone)]
pub enum TableSource {
    Snapshot,
    Scanned {
        diagnostics: ScanDiagnostics,
        load_seconds: f64,
    },
}

#[derive(Debug, Clone)]
pub struct GatedTable {
    pub table: AggregateTable,
    pub source: TableSource,
}

/// Returns the persisted table when one exists, otherwise runs `build` and
/// persists its result. An unreadable snapshot fails the run.
pub fn load_or_build<S, F>(store: &S, build: F) -> Result<GatedTable, CacheError>
where
    S: SnapshotStore + ?Sized,
    F: FnOnce() -> Result<ScanOutput, ScanError>,
{
    if let Some(table) = store.load().map_err(CacheError::Load)? {
        info!("loaded precomputed table; skipping raw scan");
        return Ok(GatedTable {
            table,
            source: TableSource::Snapshot,
        });
    }

    let ScanOutput {
        table,
        diagnostics,
        load_seconds,
    } = build()?;
    store.store(&table).map_err(CacheError::Store)?;
    info!("stored precomputed table");
    Ok(GatedTable {
        table,
        source: TableSource::Scanned {
            diagnostics,
            load_seconds,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_cache.rs"]
mod tests;
