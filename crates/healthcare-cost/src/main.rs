//! CLI entry point for the healthcare cost cleaning pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use healthcare_cost::{
    CostAnalysisReport, CostAnalyzer, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, LoggingConfig,
    Pipeline, PipelineConfig, PipelineResult, load_table_with, write_report,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean the healthcare cost dataset",
    long_about = "Loads the raw healthcare cost CSV, trims stray whitespace from headers and \
                  text cells, converts the monetary columns to numbers, reports missing values \
                  and writes the cleaned CSV.\n\n\
                  EXAMPLES:\n  \
                  # Default paths (./data/healthcare_cost.csv -> ./data/healthcare_cost_cleaned.csv)\n  \
                  healthcare-cost\n\n  \
                  # Clean and write a cost analysis report\n  \
                  healthcare-cost --analyze --report reports/costs.json"
)]
struct Args {
    /// Path to the raw CSV file
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Path for the cleaned CSV file (overwritten if present)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Leave text cells untouched (headers are still trimmed)
    #[arg(long)]
    no_trim_values: bool,

    /// Output JSON to stdout instead of logs
    ///
    /// Useful for piping to other tools: `... --json | jq .rows`
    #[arg(long)]
    json: bool,

    /// Run the cost analysis on the cleaned table
    #[arg(short, long)]
    analyze: bool,

    /// Write the cost analysis as JSON to this path (implies --analyze)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Number of DRGs to keep in the top-DRG summary
    #[arg(long, default_value = "10")]
    top_drg: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig {
        enabled: !args.json,
        level: if args.quiet {
            "warn".to_string()
        } else {
            args.log_level.clone()
        },
        ..LoggingConfig::default()
    };

    let mut config = PipelineConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .trim_text_values(!args.no_trim_values)
        .logging(logging)
        .build()?;

    // With --json nothing is installed, so stdout only carries the JSON
    if config.logging.enabled {
        tracing::subscriber::set_global_default(config.logging.subscriber())
            .context("Failed to install log subscriber")?;
        config.logging.enabled = false;
    }

    let pipeline = Pipeline::builder().config(config).build()?;

    run(&pipeline, &args)
}

fn run(pipeline: &Pipeline, args: &Args) -> Result<()> {
    // Failures are logged by the pipeline itself
    let result = pipeline.run()?;

    let analysis = if args.analyze || args.report.is_some() {
        let text_columns = &pipeline.config().text_columns;
        Some(
            analyze(&result, text_columns, args)
                .inspect_err(|e| error!("Cost analysis failed: {:#}", e))?,
        )
    } else {
        None
    };

    if args.json {
        let output = serde_json::json!({
            "pipeline": result,
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !args.quiet {
        print_human_readable_summary(&result, analysis.as_ref());
    }
    Ok(())
}

fn analyze(
    result: &PipelineResult,
    text_columns: &[String],
    args: &Args,
) -> Result<CostAnalysisReport> {
    let df = load_table_with(&result.output_path, text_columns)?;
    let input_file = result.output_path.display().to_string();
    let report = CostAnalyzer::analyze(&df, &input_file, args.top_drg)?;

    if let Some(ref path) = args.report {
        write_report(&report, path)?;
        info!("Report written to: {}", path.display());
    }
    Ok(report)
}

/// Print a short summary of the run.
///
/// Uses `println!` so the summary shows regardless of the log level.
fn print_human_readable_summary(result: &PipelineResult, analysis: Option<&CostAnalysisReport>) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    if let Some(ref input) = result.input_path {
        println!("Input:  {}", input.display());
    }
    println!(
        "Output: {} ({} rows x {} columns)",
        result.output_path.display(),
        result.rows,
        result.columns
    );
    println!("Duration: {}ms", result.duration_ms);
    println!();

    if !result.renamed_headers.is_empty() {
        println!("Trimmed Headers:");
        for (before, after) in &result.renamed_headers {
            println!("  {:?} -> {:?}", before, after);
        }
        println!();
    }

    println!("Missing Values:");
    for column in &result.missing_values.columns {
        println!("  {:<40} {}", column.column, column.missing);
    }
    println!();

    if let Some(report) = analysis {
        println!("Average Total Payments by State:");
        for entry in &report.mean_total_payments_by_state {
            println!("  {:<6} {:>12.2}", entry.group, entry.mean);
        }
        println!();

        println!("Top {} DRGs by Discharges:", report.top_drgs.len());
        for drg in &report.top_drgs {
            println!("  {:<60} {:>10.0}", drg.drg, drg.total_discharges);
        }
        println!();

        if let Some(r) = report.discharge_payment_correlation {
            println!("Discharges vs. Total Payments correlation: {:.3}", r);
            println!();
        }
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
