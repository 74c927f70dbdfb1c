use std::fs;
use std::path::Path;

use crate::input::InputError;
use crate::model::coords::TrialSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
}

/// Fixed column order of every result file.
pub const COLUMNS: [(&str, ColumnType); 6] = [
    ("agent", ColumnType::Integer),
    ("seed", ColumnType::Integer),
    ("n", ColumnType::Integer),
    ("message", ColumnType::Text),
    ("decoded", ColumnType::Text),
    ("score", ColumnType::Real),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub agent: i64,
    pub seed: i64,
    pub trial_size: i64,
    pub message: String,
    pub decoded: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("column {column} expects {kind:?}, got {value:?}")]
    Coerce {
        column: &'static str,
        kind: ColumnType,
        value: String,
    },
    #[error("row trial size {found} does not match file trial size {expected}")]
    TrialSizeMismatch { expected: TrialSize, found: i64 },
}

pub fn decode_row<S: AsRef<str>>(
    fields: &[S],
    expected_trial_size: TrialSize,
) -> Result<RawRecord, RowError> {
    if fields.len() != COLUMNS.len() {
        return Err(RowError::FieldCount {
            expected: COLUMNS.len(),
            found: fields.len(),
        });
    }

    let record = RawRecord {
        agent: parse_integer(fields, 0)?,
        seed: parse_integer(fields, 1)?,
        trial_size: parse_integer(fields, 2)?,
        message: fields[3].as_ref().to_string(),
        decoded: fields[4].as_ref().to_string(),
        score: parse_real(fields, 5)?,
    };

    if record.trial_size != i64::from(expected_trial_size) {
        return Err(RowError::TrialSizeMismatch {
            expected: expected_trial_size,
            found: record.trial_size,
        });
    }
    Ok(record)
}

fn parse_integer<S: AsRef<str>>(fields: &[S], idx: usize) -> Result<i64, RowError> {
    let raw = fields[idx].as_ref();
    raw.trim().parse::<i64>().map_err(|_| coerce_error(idx, raw))
}

// The snapshot cannot represent NaN or infinities, so they are rejected here.
fn parse_real<S: AsRef<str>>(fields: &[S], idx: usize) -> Result<f64, RowError> {
    let raw = fields[idx].as_ref();
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(coerce_error(idx, raw)),
    }
}

fn coerce_error(idx: usize, raw: &str) -> RowError {
    let (column, kind) = COLUMNS[idx];
    RowError::Coerce {
        column,
        kind,
        value: raw.to_string(),
    }
}

/// Reads a whole result file. Rows are decoded from the returned bytes so a
/// file either parses completely or is rejected as a unit.
pub fn read_result_file(path: &Path) -> Result<Vec<u8>, InputError> {
    Ok(fs::read(path)?)
}

/// Row iterator over result file contents. The first row is always treated
/// as a header and never yielded; rows may carry any number of fields so that
/// short or long rows reach [`decode_row`] instead of aborting the file.
pub fn result_reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data)
}

/// Counts empty lines after the header that lie outside quoted fields.
/// [`result_reader`] never yields these, but each one is a zero-field data
/// row and has to be counted as attempted and lost.
pub fn count_blank_rows(data: &[u8]) -> u64 {
    let mut in_quotes = false;
    let mut line = 0u64;
    let mut line_len = 0usize;
    let mut blank = 0u64;
    for &b in data {
        match b {
            b'"' => {
                in_quotes = !in_quotes;
                line_len += 1;
            }
            b'\n' if !in_quotes => {
                if line > 0 && line_len == 0 {
                    blank += 1;
                }
                line += 1;
                line_len = 0;
            }
            b'\r' if !in_quotes => {}
            _ => line_len += 1,
        }
    }
    blank
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/rows.rs"]
mod tests;
