//! Currency text to Float64 conversion.

use crate::error::{CleaningError, Result};
use crate::utils::is_numeric_dtype;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info};

static CURRENCY_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$,]").expect("Invalid regex: currency symbols"));

/// Parse a single currency-formatted value.
///
/// Every `$` and `,` is removed and the remainder is parsed as `f64`.
/// Returns `None` for empty, non-numeric or non-finite input.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_cost::cleaner::parse_monetary_value;
///
/// assert_eq!(parse_monetary_value("$1,234.56"), Some(1234.56));
/// assert_eq!(parse_monetary_value("N/A"), None);
/// ```
pub fn parse_monetary_value(raw: &str) -> Option<f64> {
    let stripped = CURRENCY_SYMBOLS.replace_all(raw, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert the named columns from currency text to Float64.
///
/// All names are checked and every column is converted before anything is
/// written back, so on error the table is exactly as it was.
///
/// # Errors
///
/// - [`CleaningError::UnknownColumn`] for the first name not in the table.
/// - [`CleaningError::MalformedMonetaryValue`] for the first cell that is
///   missing or does not parse, with its 0-based row index.
pub fn parse_monetary_columns<S: AsRef<str>>(df: &mut DataFrame, columns: &[S]) -> Result<()> {
    info!("Cleaning monetary columns.");

    for name in columns {
        let name = name.as_ref();
        if df.column(name).is_err() {
            return Err(CleaningError::UnknownColumn(name.to_string()));
        }
    }

    let mut converted = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let series = df.column(name)?.as_materialized_series();
        converted.push((name, monetary_series(series, name)?));
    }

    for (name, series) in converted {
        df.replace(name, series)?;
        debug!("Converted '{}' to Float64", name);
    }

    Ok(())
}

fn monetary_series(series: &Series, column: &str) -> Result<Series> {
    if is_numeric_dtype(series.dtype()) {
        let as_float = series.cast(&DataType::Float64)?;
        let values = as_float.f64()?;
        for (row, value) in values.into_iter().enumerate() {
            match value {
                Some(v) if v.is_finite() => {}
                other => {
                    return Err(CleaningError::MalformedMonetaryValue {
                        column: column.to_string(),
                        row,
                        value: other.map(|v| v.to_string()),
                    });
                }
            }
        }
        return Ok(as_float);
    }

    let as_text = if series.dtype() == &DataType::String {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };

    let str_series = as_text.str()?;
    let mut parsed: Vec<f64> = Vec::with_capacity(str_series.len());

    for (row, opt_val) in str_series.into_iter().enumerate() {
        let value = opt_val.and_then(parse_monetary_value).ok_or_else(|| {
            CleaningError::MalformedMonetaryValue {
                column: column.to_string(),
                row,
                value: opt_val.map(str::to_string),
            }
        })?;
        parsed.push(value);
    }

    Ok(Series::new(series.name().clone(), parsed))
}
