use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::input::filename::classify;
use crate::input::rows::{count_blank_rows, decode_row, read_result_file, result_reader};
use crate::input::{InputError, discover_result_files};
use crate::model::coords::{Coordinate, CoordinateSpace};
use crate::model::stats::{AggregateTable, StatsError};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("internal consistency fault: {0}")]
    Fault(#[from] StatsError),
}

/// Data-quality counters for one scan. Returned by value, never global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostics {
    pub files_seen: u64,
    pub files_scanned: u64,
    pub files_unclassified: u64,
    pub files_out_of_space: u64,
    pub files_unreadable: u64,
    pub total_rows: u64,
    pub lost_rows: u64,
}

impl ScanDiagnostics {
    pub fn merge(&mut self, other: &ScanDiagnostics) {
        self.files_seen += other.files_seen;
        self.files_scanned += other.files_scanned;
        self.files_unclassified += other.files_unclassified;
        self.files_out_of_space += other.files_out_of_space;
        self.files_unreadable += other.files_unreadable;
        self.total_rows += other.total_rows;
        self.lost_rows += other.lost_rows;
    }

    pub fn lost_fraction(&self) -> f64 {
        self.lost_rows as f64 / self.total_rows.max(1) as f64
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub table: AggregateTable,
    pub diagnostics: ScanDiagnostics,
    pub load_seconds: f64,
}

/// Scans every file under `input_dir`. Per-file and per-row problems are
/// logged and counted; only directory enumeration and table faults abort the
/// scan.
pub fn run_scan(input_dir: &Path) -> Result<ScanOutput, ScanError> {
    let start = Instant::now();
    let files = discover_result_files(input_dir)?;
    info!(
        "scanning {} files under {}",
        files.len(),
        input_dir.display()
    );

    let mut table = AggregateTable::initialize();
    let mut diagnostics = ScanDiagnostics::default();

    for path in &files {
        diagnostics.files_seen += 1;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(coord) = classify(&name).coordinate() else {
            warn!("failed to match result file name: {}", name);
            diagnostics.files_unclassified += 1;
            continue;
        };

        if !CoordinateSpace.contains(&coord) {
            warn!(
                "result file {} names out-of-space coordinate {}; counting its rows as lost",
                name, coord
            );
            diagnostics.files_out_of_space += 1;
            match tally_lost_file(path) {
                Ok(file_diag) => diagnostics.merge(&file_diag),
                Err(e) => {
                    warn!("failed to read result file {}: {}", name, e);
                    diagnostics.files_unreadable += 1;
                }
            }
            continue;
        }

        match scan_file(path, coord) {
            Ok((partial, file_diag)) => {
                if let Some(stat) = partial.get(&coord) {
                    debug!(
                        "{} -> {}: kept {} of {} rows",
                        name, coord, stat.count, file_diag.total_rows
                    );
                }
                table.merge(&partial);
                diagnostics.merge(&file_diag);
                diagnostics.files_scanned += 1;
            }
            Err(ScanError::Input(e)) => {
                warn!("failed to read result file {}: {}", name, e);
                diagnostics.files_unreadable += 1;
            }
            Err(fault) => return Err(fault),
        }
    }

    let load_seconds = start.elapsed().as_secs_f64();
    info!("total rows: {}", diagnostics.total_rows);
    info!(
        "lost rows: {} ({:.2}%)",
        diagnostics.lost_rows,
        diagnostics.lost_fraction() * 100.0
    );
    info!("load time: {:.1}s", load_seconds);

    Ok(ScanOutput {
        table,
        diagnostics,
        load_seconds,
    })
}

/// Reads one classified file into its own partial table. A read error
/// discards the whole file, including its counters.
pub fn scan_file(
    path: &Path,
    coord: Coordinate,
) -> Result<(AggregateTable, ScanDiagnostics), ScanError> {
    let data = read_result_file(path)?;
    let mut reader = result_reader(&data);
    let mut table = AggregateTable::initialize();
    let mut diag = blank_row_diagnostics(path, &data);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(InputError::from)?;
        diag.total_rows += 1;
        let fields: Vec<&str> = record.iter().collect();
        match decode_row(&fields, coord.trial_size) {
            Ok(row) => table.accumulate(coord, row.score)?,
            Err(e) => {
                diag.lost_rows += 1;
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(row_no as u64 + 2);
                debug!("dropping row {}:{}: {}", path.display(), line, e);
            }
        }
    }

    Ok((table, diag))
}

/// Counts every row of a file whose coordinate lies outside the declared
/// space as attempted and lost.
pub fn tally_lost_file(path: &Path) -> Result<ScanDiagnostics, InputError> {
    let data = read_result_file(path)?;
    let mut reader = result_reader(&data);
    let mut diag = blank_row_diagnostics(path, &data);
    for result in reader.records() {
        result?;
        diag.total_rows += 1;
        diag.lost_rows += 1;
    }
    Ok(diag)
}

fn blank_row_diagnostics(path: &Path, data: &[u8]) -> ScanDiagnostics {
    let blank = count_blank_rows(data);
    if blank > 0 {
        debug!("dropping {} blank rows in {}", blank, path.display());
    }
    ScanDiagnostics {
        total_rows: blank,
        lost_rows: blank,
        ..ScanDiagnostics::default()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_scan.rs"]
mod tests;
