//! Header and text-cell whitespace handling.

use crate::error::{CleaningError, Result};
use crate::utils::{column_names, trimmed_text_series};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Trim leading/trailing whitespace from every column header.
///
/// Column count and order never change, and cell values are left alone.
/// Returns `(old, new)` for each header that changed; an already-clean table
/// yields an empty list and is not touched.
///
/// # Errors
///
/// [`CleaningError::DuplicateColumn`] if two headers collide once trimmed
/// (e.g. `"State"` and `"State "`). The table is unchanged in that case.
pub fn normalize_headers(df: &mut DataFrame) -> Result<Vec<(String, String)>> {
    info!("Trimming spaces from column names.");

    let original = column_names(df);
    let trimmed: Vec<String> = original.iter().map(|n| n.trim().to_string()).collect();

    let mut seen = HashSet::with_capacity(trimmed.len());
    for name in &trimmed {
        if !seen.insert(name.as_str()) {
            return Err(CleaningError::DuplicateColumn(name.clone()));
        }
    }

    let renamed: Vec<(String, String)> = original
        .iter()
        .zip(&trimmed)
        .filter(|(old, new)| old != new)
        .map(|(old, new)| (old.clone(), new.clone()))
        .collect();

    if renamed.is_empty() {
        debug!("All column names already trimmed");
        return Ok(renamed);
    }

    df.set_column_names(trimmed.iter().map(|s| s.as_str()))?;

    for (old, new) in &renamed {
        debug!("Renamed column {:?} -> {:?}", old, new);
    }

    Ok(renamed)
}

/// Trim surrounding whitespace from every text cell.
///
/// Only `String` columns are touched; numeric columns and nulls pass through.
/// Returns the number of cells whose value changed.
pub fn trim_text_values(df: &mut DataFrame) -> Result<usize> {
    info!("Trimming whitespace from text values.");

    let mut total_trimmed = 0;

    for col_name in column_names(df) {
        let series = df.column(&col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }

        let changed = series
            .str()?
            .into_iter()
            .flatten()
            .filter(|v| v.trim().len() != v.len())
            .count();

        if changed > 0 {
            df.replace(&col_name, trimmed_text_series(&series)?)?;
            debug!("Trimmed {} values in '{}'", changed, col_name);
            total_trimmed += changed;
        }
    }

    Ok(total_trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(df: &DataFrame) -> Vec<String> {
        column_names(df)
    }

    #[test]
    fn test_normalize_headers_trims() {
        let mut df = df![
            "Provider State " => ["CA"],
            " Average Total Payments" => ["$1,000.00"],
            "\tDRG Definition\t" => ["039 - EXTRACRANIAL PROCEDURES"],
        ]
        .unwrap();

        let renamed = normalize_headers(&mut df).unwrap();

        assert_eq!(
            names(&df),
            vec!["Provider State", "Average Total Payments", "DRG Definition"]
        );
        assert_eq!(renamed.len(), 3);
        assert_eq!(
            renamed[0],
            ("Provider State ".to_string(), "Provider State".to_string())
        );
    }

    #[test]
    fn test_normalize_headers_is_idempotent() {
        let mut df = df![
            " a " => [1i64],
            "b" => [2i64],
        ]
        .unwrap();

        normalize_headers(&mut df).unwrap();
        let once = names(&df);
        let renamed = normalize_headers(&mut df).unwrap();

        assert!(renamed.is_empty());
        assert_eq!(names(&df), once);
    }

    #[test]
    fn test_normalize_headers_keeps_column_count_and_order() {
        let mut df = df![
            "z " => [1i64],
            " y" => [2i64],
            "x" => [3i64],
        ]
        .unwrap();
        let before = df.width();

        normalize_headers(&mut df).unwrap();

        assert_eq!(df.width(), before);
        assert_eq!(names(&df), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_normalize_headers_leaves_cells_untouched() {
        let mut df = df![
            "Provider State " => [" CA "],
        ]
        .unwrap();

        normalize_headers(&mut df).unwrap();

        let states = df.column("Provider State").unwrap().str().unwrap();
        assert_eq!(states.get(0), Some(" CA "));
    }

    #[test]
    fn test_normalize_headers_rejects_collisions() {
        let mut df = df![
            "State" => ["CA"],
            "State " => ["NY"],
        ]
        .unwrap();

        let err = normalize_headers(&mut df).unwrap_err();
        assert!(matches!(err, CleaningError::DuplicateColumn(ref name) if name == "State"));
        assert_eq!(names(&df), vec!["State", "State "]);
    }

    #[test]
    fn test_trim_text_values() {
        let mut df = df![
            "Provider State" => [Some(" CA "), Some("NY"), None],
            "Total Discharges" => [Some(10i64), Some(20), Some(30)],
        ]
        .unwrap();

        let changed = trim_text_values(&mut df).unwrap();

        assert_eq!(changed, 1);
        let states = df.column("Provider State").unwrap().str().unwrap();
        assert_eq!(states.get(0), Some("CA"));
        assert_eq!(states.get(1), Some("NY"));
        assert_eq!(states.get(2), None);
        assert_eq!(
            df.column("Total Discharges").unwrap().dtype(),
            &DataType::Int64
        );
    }

    #[test]
    fn test_trim_text_values_noop_on_clean_table() {
        let mut df = df!["Provider State" => ["CA", "NY"]].unwrap();
        assert_eq!(trim_text_values(&mut df).unwrap(), 0);
    }
}
