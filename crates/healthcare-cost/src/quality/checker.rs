//! Missing-value counting.
//!
//! The checker is observational: it reads the table, never mutates it, and
//! the pipeline does not branch on what it finds.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Missing-cell count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Per-column missing counts, in table column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub columns: Vec<ColumnMissing>,
}

impl MissingValueReport {
    /// Missing count for `column`, or `None` if the column was not checked.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }

    /// Total missing cells across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Columns with at least one missing cell.
    pub fn columns_with_missing(&self) -> Vec<&ColumnMissing> {
        self.columns.iter().filter(|c| c.missing > 0).collect()
    }

    /// True when no column has a missing cell.
    pub fn is_complete(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .columns
            .iter()
            .map(|c| c.column.len())
            .max()
            .unwrap_or(0);
        for (i, c) in self.columns.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<width$}  {}", c.column, c.missing, width = width)?;
        }
        Ok(())
    }
}

/// Counts null cells per column.
pub struct IntegrityChecker;

impl IntegrityChecker {
    /// Count missing (null) cells in every column of `df`.
    pub fn count_missing(df: &DataFrame) -> MissingValueReport {
        info!("Checking for missing values.");

        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnMissing {
                column: col.name().to_string(),
                missing: col.null_count(),
            })
            .collect();

        MissingValueReport { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_count_missing_per_column() {
        let df = df![
            "X" => [Some(1.0), None, Some(3.0), None],
            "Y" => [Some("a"), Some("b"), Some("c"), Some("d")],
            "Z" => [Some(1i64), Some(2), Some(3), Some(4)],
        ]
        .unwrap();

        let report = IntegrityChecker::count_missing(&df);

        assert_eq!(report.get("X"), Some(2));
        assert_eq!(report.get("Y"), Some(0));
        assert_eq!(report.get("Z"), Some(0));
        assert_eq!(report.get("nope"), None);
        assert_eq!(report.total(), 2);
        assert_eq!(report.columns_with_missing().len(), 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_count_missing_does_not_mutate() {
        let df = df![
            "X" => [Some("a"), None],
        ]
        .unwrap();
        let before = df.clone();

        let _ = IntegrityChecker::count_missing(&df);

        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_report_keeps_column_order() {
        let df = df![
            "b" => [1i64],
            "a" => [2i64],
        ]
        .unwrap();

        let report = IntegrityChecker::count_missing(&df);
        let order: Vec<&str> = report.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert!(report.is_complete());
    }

    #[test]
    fn test_report_display() {
        let report = MissingValueReport {
            columns: vec![
                ColumnMissing {
                    column: "Provider State".to_string(),
                    missing: 0,
                },
                ColumnMissing {
                    column: "Zip".to_string(),
                    missing: 3,
                },
            ],
        };
        let text = report.to_string();
        assert_eq!(text, "Provider State  0\nZip             3");
    }
}
