use std::path::{Path, PathBuf};

pub mod filename;
pub mod rows;
pub mod snapshot;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
}

/// Lists the regular files directly under `input_dir`, sorted by file name so
/// scans and logs are deterministic.
pub fn discover_result_files(input_dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !input_dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "results directory {} does not exist",
            input_dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
