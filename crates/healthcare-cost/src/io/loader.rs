//! CSV loading.

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Load a CSV file into a DataFrame.
///
/// Every row is kept in source order and header text is preserved as-is,
/// including any stray whitespace. Types are inferred over the whole file so
/// a late non-numeric value cannot break an earlier guess.
///
/// # Errors
///
/// - [`CleaningError::NotFound`] if `path` is not an existing regular file.
/// - [`CleaningError::LoadFailure`] for any other read, encoding or parse error.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    load_table_with::<&str>(path, &[])
}

/// Load a CSV file, reading the named columns as `String` instead of
/// inferring their type.
///
/// Names are matched after trimming, so `" Provider Zip Code "` in the file
/// matches `"Provider Zip Code"`. Identifier columns such as zip codes keep
/// their leading zeros this way. Names absent from the file are ignored.
///
/// # Errors
///
/// Same as [`load_table`].
pub fn load_table_with<S: AsRef<str>>(
    path: impl AsRef<Path>,
    text_columns: &[S],
) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading data from {}", path.display());

    if !path.is_file() {
        error!("File not found: {}", path.display());
        return Err(CleaningError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let overrides = if text_columns.is_empty() {
        None
    } else {
        text_schema(path, text_columns)?
    };

    let file = File::open(path).map_err(|e| load_failure(path, e))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_schema_overwrite(overrides)
        .with_parse_options(csv_parse_options())
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| load_failure(path, e))?;

    debug!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

fn csv_parse_options() -> CsvParseOptions {
    CsvParseOptions::default().with_quote_char(Some(b'"'))
}

/// Schema forcing the raw headers that match `text_columns` to `String`.
/// `None` when no header matches.
fn text_schema<S: AsRef<str>>(path: &Path, text_columns: &[S]) -> Result<Option<SchemaRef>> {
    let file = File::open(path).map_err(|e| load_failure(path, e))?;
    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .with_parse_options(csv_parse_options())
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| load_failure(path, e))?;

    let fields: Vec<Field> = header
        .get_column_names()
        .into_iter()
        .filter(|name| {
            text_columns
                .iter()
                .any(|wanted| wanted.as_ref().trim() == name.trim())
        })
        .map(|name| {
            debug!("Reading column '{}' as text", name);
            Field::new(name.clone(), DataType::String)
        })
        .collect();

    if fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(Arc::new(Schema::from_iter(fields))))
}

fn load_failure(path: &Path, cause: impl std::fmt::Display) -> CleaningError {
    let err = CleaningError::LoadFailure {
        path: path.to_path_buf(),
        reason: cause.to_string(),
    };
    error!("{}", err);
    err
}
