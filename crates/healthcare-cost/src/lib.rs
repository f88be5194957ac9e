//! Healthcare Cost Cleaning Library
//!
//! Cleans the hospital charges and payments dataset with Polars and
//! summarizes costs by state and by diagnosis-related group (DRG).
//!
//! # Overview
//!
//! A run is a one-shot batch transform over a static CSV file:
//!
//! - **Loading**: Reads the raw CSV with every row and the original header text
//! - **Header Normalization**: Trims stray whitespace from column names
//! - **Text Trimming**: Trims surrounding whitespace from text cells
//! - **Monetary Parsing**: Converts `"$12,345.67"` style columns to `Float64`
//! - **Integrity Checks**: Counts missing cells per column
//! - **Saving**: Writes the cleaned table back to disk as CSV
//! - **Cost Analysis**: Optional grouped aggregates emitted as a JSON report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use healthcare_cost::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("./data/healthcare_cost.csv")
//!     .output_path("./data/healthcare_cost_cleaned.csv")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("Missing values:\n{}", result.missing_values);
//! ```
//!
//! # Cost Analysis
//!
//! ```rust,ignore
//! use healthcare_cost::analysis::{CostAnalyzer, write_report};
//! use healthcare_cost::io::load_table;
//!
//! let df = load_table("./data/healthcare_cost_cleaned.csv")?;
//! let report = CostAnalyzer::analyze(&df, "./data/healthcare_cost_cleaned.csv", 10)?;
//! write_report(&report, "./reports/costs.json")?;
//! ```

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{CostAnalysisReport, CostAnalyzer, write_report};
pub use cleaner::{
    normalize_headers, parse_monetary_columns, parse_monetary_value, trim_text_values,
};
pub use config::{
    ConfigValidationError, DEFAULT_INPUT_PATH, DEFAULT_MONETARY_COLUMNS, DEFAULT_OUTPUT_PATH,
    DEFAULT_TEXT_COLUMNS, LoggingConfig, PipelineConfig, PipelineConfigBuilder,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use io::{load_table, load_table_with, save_table};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineState, ProgressReporter,
    ProgressUpdate,
};
pub use quality::{ColumnMissing, IntegrityChecker, MissingValueReport};
pub use types::PipelineResult;
