//! Descriptive cost analysis over a cleaned table.
//!
//! Aggregates by provider state and by DRG. Group keys are compared after
//! trimming, so `" CA "` and `"CA"` land in the same group; null or blank
//! keys are left out. Null numeric cells are skipped per aggregate.

mod report;

pub use report::{
    CostAnalysisReport, DrgSummary, FiveNumberSummary, GroupMean, StateDistribution,
    write_report,
};

use crate::error::{CleaningError, Result, ResultExt};
use chrono::Local;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const STATE_COLUMN: &str = "Provider State";
pub const DRG_COLUMN: &str = "DRG Definition";
pub const DISCHARGES_COLUMN: &str = "Total Discharges";
pub const COVERED_CHARGES_COLUMN: &str = "Average Covered Charges";
pub const TOTAL_PAYMENTS_COLUMN: &str = "Average Total Payments";
pub const MEDICARE_PAYMENTS_COLUMN: &str = "Average Medicare Payments";

/// Cost analyzer for the cleaned healthcare table.
pub struct CostAnalyzer;

impl CostAnalyzer {
    /// Mean of `value_column` per provider state, sorted by state.
    pub fn mean_by_state(df: &DataFrame, value_column: &str) -> Result<Vec<GroupMean>> {
        let groups = grouped_values(df, STATE_COLUMN, value_column)?;

        Ok(groups
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(group, values)| GroupMean {
                mean: series_mean(&values).unwrap_or(0.0),
                count: values.len(),
                group,
            })
            .collect())
    }

    /// Top `n` DRGs by summed discharges, ties broken by name.
    pub fn top_drg_summary(df: &DataFrame, n: usize) -> Result<Vec<DrgSummary>> {
        let keys = group_keys(df, DRG_COLUMN)?;
        let discharges = numeric_values(df, DISCHARGES_COLUMN)?;
        let total_payments = numeric_values(df, TOTAL_PAYMENTS_COLUMN)?;
        let medicare_payments = numeric_values(df, MEDICARE_PAYMENTS_COLUMN)?;

        #[derive(Default)]
        struct Acc {
            discharges: f64,
            total: Vec<f64>,
            medicare: Vec<f64>,
            rows: usize,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
        for (row, key) in keys.into_iter().enumerate() {
            let Some(key) = key else { continue };
            let acc = groups.entry(key).or_default();
            acc.rows += 1;
            if let Some(v) = discharges[row] {
                acc.discharges += v;
            }
            if let Some(v) = total_payments[row] {
                acc.total.push(v);
            }
            if let Some(v) = medicare_payments[row] {
                acc.medicare.push(v);
            }
        }

        let mut summaries: Vec<DrgSummary> = groups
            .into_iter()
            .map(|(drg, acc)| DrgSummary {
                drg,
                total_discharges: acc.discharges,
                mean_total_payments: series_mean(&acc.total),
                mean_medicare_payments: series_mean(&acc.medicare),
                providers: acc.rows,
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.total_discharges
                .total_cmp(&a.total_discharges)
                .then_with(|| a.drg.cmp(&b.drg))
        });
        summaries.truncate(n);
        Ok(summaries)
    }

    /// Five-number summary of covered charges per state, sorted by state.
    pub fn charges_distribution_by_state(df: &DataFrame) -> Result<Vec<StateDistribution>> {
        let groups = grouped_values(df, STATE_COLUMN, COVERED_CHARGES_COLUMN)?;

        Ok(groups
            .into_iter()
            .filter_map(|(state, values)| {
                FiveNumberSummary::from_values(&values).map(|summary| StateDistribution {
                    state,
                    count: values.len(),
                    summary,
                })
            })
            .collect())
    }

    /// Pearson correlation of discharges vs. average total payments over
    /// rows where both are present.
    pub fn discharge_payment_correlation(df: &DataFrame) -> Result<Option<f64>> {
        let discharges = numeric_values(df, DISCHARGES_COLUMN)?;
        let payments = numeric_values(df, TOTAL_PAYMENTS_COLUMN)?;

        let (x, y): (Vec<f64>, Vec<f64>) = discharges
            .into_iter()
            .zip(payments)
            .filter_map(|pair| match pair {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .unzip();

        pearson(x, y)
    }

    /// Run every aggregate and bundle them into a report.
    pub fn analyze(df: &DataFrame, input_file: &str, top_n: usize) -> Result<CostAnalysisReport> {
        info!("Analyzing costs for {} rows...", df.height());

        let report = CostAnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            rows: df.height(),
            mean_total_payments_by_state: Self::mean_by_state(df, TOTAL_PAYMENTS_COLUMN)
                .context("Average total payments by state")?,
            mean_discharges_by_state: Self::mean_by_state(df, DISCHARGES_COLUMN)
                .context("Average discharges by state")?,
            top_drgs: Self::top_drg_summary(df, top_n).context("Top DRG summary")?,
            covered_charges_by_state: Self::charges_distribution_by_state(df)
                .context("Covered charges by state")?,
            discharge_payment_correlation: Self::discharge_payment_correlation(df)
                .context("Discharge/payment correlation")?,
        };

        debug!(
            "Analysis covered {} states and {} DRGs",
            report.mean_total_payments_by_state.len(),
            report.top_drgs.len()
        );
        Ok(report)
    }
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| CleaningError::UnknownColumn(name.to_string()))
}

/// Trimmed text keys; null and blank keys become `None`.
fn group_keys(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = required_column(df, column)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from))
        .collect())
}

fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = required_column(df, column)?;
    if !crate::utils::is_numeric_dtype(series.dtype()) {
        return Err(CleaningError::AnalysisFailed(format!(
            "Column '{}' has type {}, expected a numeric column",
            column,
            series.dtype()
        )));
    }
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

fn grouped_values(
    df: &DataFrame,
    key_column: &str,
    value_column: &str,
) -> Result<BTreeMap<String, Vec<f64>>> {
    let keys = group_keys(df, key_column)?;
    let values = numeric_values(df, value_column)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        if let Some(key) = key {
            let entry = groups.entry(key).or_default();
            if let Some(value) = value {
                entry.push(value);
            }
        }
    }
    Ok(groups)
}

/// Mean of the non-null values, via polars.
fn series_mean(values: &[f64]) -> Option<f64> {
    Series::new("values".into(), values).mean()
}

/// Pearson correlation through the lazy `pearson_corr` expression.
/// Non-finite results (constant input) are reported as `None`.
fn pearson(x: Vec<f64>, y: Vec<f64>) -> Result<Option<f64>> {
    if x.len() < 2 {
        return Ok(None);
    }

    let pairs = df!["x" => x, "y" => y]?;
    let out = pairs
        .lazy()
        .select([pearson_corr(col("x"), col("y")).alias("r")])
        .collect()?;

    Ok(out
        .column("r")?
        .cast(&DataType::Float64)?
        .f64()?
        .get(0)
        .filter(|r| r.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "DRG Definition" => ["039 - EXTRACRANIAL", "057 - DEGENERATIVE", "039 - EXTRACRANIAL ", "064 - HEMORRHAGE"],
            "Provider State" => [Some(" CA"), Some("NY"), Some("CA "), None],
            "Total Discharges" => [10i64, 30, 20, 5],
            "Average Covered Charges" => [1000.0, 4000.0, 3000.0, 500.0],
            "Average Total Payments" => [100.0, 400.0, 300.0, 50.0],
            "Average Medicare Payments" => [Some(80.0), Some(350.0), None, Some(40.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_mean_by_state_trims_keys_and_skips_null_states() {
        let means = CostAnalyzer::mean_by_state(&sample(), TOTAL_PAYMENTS_COLUMN).unwrap();
        assert_eq!(
            means,
            vec![
                GroupMean {
                    group: "CA".to_string(),
                    mean: 200.0,
                    count: 2
                },
                GroupMean {
                    group: "NY".to_string(),
                    mean: 400.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_drg_summary_orders_by_discharges() {
        let top = CostAnalyzer::top_drg_summary(&sample(), 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].drg, "039 - EXTRACRANIAL");
        assert_eq!(top[0].total_discharges, 30.0);
        assert_eq!(top[0].providers, 2);
        assert_eq!(top[0].mean_total_payments, Some(200.0));
        assert_eq!(top[0].mean_medicare_payments, Some(80.0));
        // Tied at 30 discharges; name breaks the tie
        assert_eq!(top[1].drg, "057 - DEGENERATIVE");
    }

    #[test]
    fn test_top_drg_summary_zero() {
        assert!(CostAnalyzer::top_drg_summary(&sample(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_charges_distribution_by_state() {
        let dist = CostAnalyzer::charges_distribution_by_state(&sample()).unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].state, "CA");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].summary.min, 1000.0);
        assert_eq!(dist[0].summary.median, 2000.0);
        assert_eq!(dist[0].summary.max, 3000.0);
    }

    #[test]
    fn test_correlation_perfect_and_degenerate() {
        let df = df![
            "Total Discharges" => [1.0, 2.0, 3.0],
            "Average Total Payments" => [10.0, 20.0, 30.0],
        ]
        .unwrap();
        let r = CostAnalyzer::discharge_payment_correlation(&df).unwrap().unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let constant = df![
            "Total Discharges" => [1.0, 2.0, 3.0],
            "Average Total Payments" => [10.0, 10.0, 10.0],
        ]
        .unwrap();
        assert_eq!(
            CostAnalyzer::discharge_payment_correlation(&constant).unwrap(),
            None
        );
    }

    #[test]
    fn test_correlation_partial_and_too_few_rows() {
        let df = df![
            "Total Discharges" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)],
            "Average Total Payments" => [Some(2.0), Some(1.0), Some(9.0), Some(4.0), Some(3.0)],
        ]
        .unwrap();
        // The row with a null discharge count is dropped before correlating
        let r = CostAnalyzer::discharge_payment_correlation(&df).unwrap().unwrap();
        assert!((r - 0.6).abs() < 1e-12);

        let single = df![
            "Total Discharges" => [1.0],
            "Average Total Payments" => [10.0],
        ]
        .unwrap();
        assert_eq!(
            CostAnalyzer::discharge_payment_correlation(&single).unwrap(),
            None
        );
    }

    #[test]
    fn test_missing_column_is_unknown_column() {
        let df = df!["Provider State" => ["CA"]].unwrap();
        let err = CostAnalyzer::mean_by_state(&df, TOTAL_PAYMENTS_COLUMN).unwrap_err();
        assert!(matches!(err, CleaningError::UnknownColumn(name) if name == TOTAL_PAYMENTS_COLUMN));
    }

    #[test]
    fn test_text_value_column_fails_analysis() {
        let df = df![
            "Provider State" => ["CA"],
            "Average Total Payments" => ["$100.00"],
        ]
        .unwrap();
        let err = CostAnalyzer::mean_by_state(&df, TOTAL_PAYMENTS_COLUMN).unwrap_err();
        assert_eq!(err.error_code(), "ANALYSIS_FAILED");
    }

    #[test]
    fn test_analyze_bundles_everything() {
        let report = CostAnalyzer::analyze(&sample(), "clean.csv", 10).unwrap();
        assert_eq!(report.rows, 4);
        assert_eq!(report.input_file, "clean.csv");
        assert_eq!(report.top_drgs.len(), 3);
        assert_eq!(report.mean_discharges_by_state[0].mean, 15.0);
        assert!(report.discharge_payment_correlation.is_some());
    }
}
