use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Mean of a numeric column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    /// Non-null values that went into the mean.
    pub count: usize,
}

/// Aggregates for one diagnosis-related group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrgSummary {
    pub drg: String,
    pub total_discharges: f64,
    pub mean_total_payments: Option<f64>,
    pub mean_medicare_payments: Option<f64>,
    /// Rows (providers) reporting this DRG.
    pub providers: usize,
}

/// Five-number summary; quartiles use linear interpolation between ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarize `values`. Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Interquartile range, `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Distribution of covered charges within one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDistribution {
    pub state: String,
    pub count: usize,
    pub summary: FiveNumberSummary,
}

/// Descriptive cost analysis of a cleaned table.
///
/// Written by the CLI's `--report` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostAnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the analyzed file
    pub input_file: String,
    pub rows: usize,

    pub mean_total_payments_by_state: Vec<GroupMean>,
    pub mean_discharges_by_state: Vec<GroupMean>,
    pub top_drgs: Vec<DrgSummary>,
    pub covered_charges_by_state: Vec<StateDistribution>,
    /// Pearson correlation of discharges vs. average total payments.
    /// `None` with fewer than two complete rows or a constant column.
    pub discharge_payment_correlation: Option<f64>,
}

/// Write `report` as pretty-printed JSON, creating parent directories.
pub fn write_report(report: &CostAnalysisReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", path.display());
    Ok(())
}

pub(crate) fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_number_summary_interpolates() {
        let summary = FiveNumberSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q3, 3.25);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.iqr(), 1.5);
    }

    #[test]
    fn test_five_number_summary_single_value() {
        let summary = FiveNumberSummary::from_values(&[7.5]).unwrap();
        assert_eq!(summary.min, 7.5);
        assert_eq!(summary.median, 7.5);
        assert_eq!(summary.max, 7.5);
        assert!(FiveNumberSummary::from_values(&[]).is_none());
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("costs.json");
        let report = CostAnalysisReport {
            generated_at: "2024-01-01 00:00:00".to_string(),
            input_file: "clean.csv".to_string(),
            rows: 0,
            mean_total_payments_by_state: vec![],
            mean_discharges_by_state: vec![],
            top_drgs: vec![],
            covered_charges_by_state: vec![],
            discharge_payment_correlation: None,
        };

        write_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["input_file"], "clean.csv");
        assert!(value["discharge_payment_correlation"].is_null());
    }
}
