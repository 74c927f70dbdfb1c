use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::coords::{Coordinate, CoordinateSpace, Domain, Group, TrialSize};
use crate::model::stats::{AggregateTable, SufficientStat};

const SNAPSHOT_FORMAT: &str = "tournament-stats/aggregate-table";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Load/store capability for a persisted [`AggregateTable`].
pub trait SnapshotStore {
    /// `Ok(None)` when no snapshot exists. A snapshot that exists but cannot
    /// be read back exactly is an error.
    fn load(&self) -> Result<Option<AggregateTable>, SnapshotError>;
    fn store(&self, table: &AggregateTable) -> Result<(), SnapshotError>;
    /// Removes the snapshot so the next gate forces a rebuild.
    fn invalidate(&self) -> Result<(), SnapshotError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDoc {
    format: String,
    version: u32,
    entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    group: Group,
    domain: Domain,
    n: TrialSize,
    count: u64,
    score_sum: f64,
}

#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> SnapshotError {
        SnapshotError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn table_from_doc(&self, doc: SnapshotDoc) -> Result<AggregateTable, SnapshotError> {
        if doc.format != SNAPSHOT_FORMAT || doc.version != SNAPSHOT_VERSION {
            return Err(self.corrupt(format!(
                "unsupported format {:?} version {}",
                doc.format, doc.version
            )));
        }
        if doc.entries.len() != CoordinateSpace.len() {
            return Err(self.corrupt(format!(
                "expected {} entries, found {}",
                CoordinateSpace.len(),
                doc.entries.len()
            )));
        }

        let mut table = AggregateTable::initialize();
        let mut seen = BTreeSet::new();
        for entry in doc.entries {
            let coord = Coordinate::new(entry.group, entry.domain, entry.n);
            if !seen.insert(coord) {
                return Err(self.corrupt(format!("duplicate entry for {coord}")));
            }
            if !entry.score_sum.is_finite() {
                return Err(self.corrupt(format!("non-finite score sum at {coord}")));
            }
            table
                .set(coord, SufficientStat::new(entry.count, entry.score_sum))
                .map_err(|e| self.corrupt(e.to_string()))?;
        }
        Ok(table)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Option<AggregateTable>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let doc: SnapshotDoc =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| SnapshotError::Json {
                path: self.path.clone(),
                source,
            })?;
        self.table_from_doc(doc).map(Some)
    }

    fn store(&self, table: &AggregateTable) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let doc = SnapshotDoc {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            entries: table
                .iter()
                .map(|(coord, stat)| SnapshotEntry {
                    group: coord.group,
                    domain: coord.domain,
                    n: coord.trial_size,
                    count: stat.count,
                    score_sum: stat.score_sum,
                })
                .collect(),
        };
        let mut w = BufWriter::new(File::create(&self.path).map_err(|e| self.io_error(e))?);
        serde_json::to_writer(&mut w, &doc).map_err(|source| SnapshotError::Json {
            path: self.path.clone(),
            source,
        })?;
        w.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn invalidate(&self) -> Result<(), SnapshotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/snapshot.rs"]
mod tests;
