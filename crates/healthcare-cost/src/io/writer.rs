//! CSV persistence.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Save a DataFrame as CSV at `path`, replacing any existing file.
///
/// The header row is written, rows keep their order and no index column is
/// added. Data is written to a hidden sibling file first and renamed into
/// place, so a failed write never leaves a partial output behind. Missing
/// parent directories are not created.
///
/// # Errors
///
/// Returns [`CleaningError::WriteFailure`] on any I/O or serialization error.
pub fn save_table(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    info!("Saving cleaned data to {}", path.display());

    let tmp_path = temp_path_for(path);

    if let Err(e) = write_csv(df, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failure(path, e));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failure(path, e));
    }

    debug!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

fn write_csv(df: &mut DataFrame, tmp_path: &Path) -> std::result::Result<(), String> {
    let mut file = File::create(tmp_path).map_err(|e| e.to_string())?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .map_err(|e| e.to_string())?;

    file.sync_all().map_err(|e| e.to_string())
}

/// `dir/name.csv` -> `dir/.name.csv.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

fn write_failure(path: &Path, cause: impl std::fmt::Display) -> CleaningError {
    let err = CleaningError::WriteFailure {
        path: path.to_path_buf(),
        reason: cause.to_string(),
    };
    error!("{}", err);
    err
}
