//! Shared helpers for working with the record table.

use polars::prelude::*;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column names of a DataFrame as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// `(column, dtype)` pairs in table order, e.g. `("Total Discharges", "i64")`.
pub fn column_types(df: &DataFrame) -> Vec<(String, String)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.dtype().to_string()))
        .collect()
}

/// Copy a text column with every value trimmed. Nulls stay null.
pub fn trimmed_text_series(series: &Series) -> PolarsResult<Series> {
    let str_series = series.str()?;
    let values: Vec<Option<&str>> = str_series.into_iter().map(|v| v.map(str::trim)).collect();
    Ok(Series::new(series.name().clone(), values))
}

/// First `rows` rows rendered one line each, cells joined by `", "`.
pub fn preview_lines(df: &DataFrame, rows: usize) -> Vec<String> {
    let head = df.head(Some(rows));
    (0..head.height())
        .filter_map(|idx| head.get(idx))
        .map(|row| {
            row.iter()
                .map(|value| match value {
                    AnyValue::Null => "null".to_string(),
                    AnyValue::String(s) => s.to_string(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}
