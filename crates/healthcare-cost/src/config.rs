//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! Logging is part of the configuration so a pipeline carries its own
//! verbosity instead of depending on a process-wide subscriber.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default location of the raw dataset.
pub const DEFAULT_INPUT_PATH: &str = "./data/healthcare_cost.csv";

/// Default location of the cleaned dataset.
pub const DEFAULT_OUTPUT_PATH: &str = "./data/healthcare_cost_cleaned.csv";

/// Currency-formatted columns of the healthcare cost dataset.
pub const DEFAULT_MONETARY_COLUMNS: [&str; 3] = [
    "Average Covered Charges",
    "Average Total Payments",
    "Average Medicare Payments",
];

/// Identifier columns read as text so leading zeros survive.
pub const DEFAULT_TEXT_COLUMNS: [&str; 2] = ["Provider Id", "Provider Zip Code"];

/// Logging settings applied by the pipeline while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether the pipeline installs its own subscriber for the run.
    /// When false, events go to whatever subscriber is already active.
    /// Default: true
    pub enabled: bool,

    /// Filter directive (`trace`, `debug`, `info`, `warn`, `error`, or a full
    /// `EnvFilter` expression). `RUST_LOG` takes precedence when set.
    /// Default: "info"
    pub level: String,

    /// Whether to include the event target (module path) in each line.
    /// Default: false
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// Logging that leaves event dispatch to the caller.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Build a single-line `fmt` subscriber (timestamp, level, message).
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.with_target)
            .finish()
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_cost::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_path("raw.csv")
///     .output_path("clean.csv")
///     .log_level("debug")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw CSV to read.
    /// Default: "./data/healthcare_cost.csv"
    pub input_path: PathBuf,

    /// Where the cleaned CSV is written. Overwritten without confirmation.
    /// Default: "./data/healthcare_cost_cleaned.csv"
    pub output_path: PathBuf,

    /// Columns converted from currency text to Float64, in order.
    /// Default: the three "Average ..." columns of the dataset.
    pub monetary_columns: Vec<String>,

    /// Columns read as `String` instead of inferring a type. Matched after
    /// trimming the raw header.
    /// Default: "Provider Id" and "Provider Zip Code".
    #[serde(default = "default_text_columns")]
    pub text_columns: Vec<String>,

    /// Whether to trim surrounding whitespace from text cells.
    /// Default: true
    pub trim_text_values: bool,

    /// Number of cleaned rows echoed to the log after cleaning.
    /// Default: 5
    pub preview_rows: usize,

    /// Logging for the run.
    pub logging: LoggingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            monetary_columns: default_monetary_columns(),
            text_columns: default_text_columns(),
            trim_text_values: true,
            preview_rows: 5,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_monetary_columns() -> Vec<String> {
    DEFAULT_MONETARY_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_text_columns() -> Vec<String> {
    DEFAULT_TEXT_COLUMNS.iter().map(|s| s.to_string()).collect()
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("input_path".to_string()));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("output_path".to_string()));
        }

        if self.input_path == self.output_path {
            return Err(ConfigValidationError::SameInputAndOutput(
                self.input_path.clone(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.monetary_columns {
            if !seen.insert(column.as_str()) {
                return Err(ConfigValidationError::DuplicateMonetaryColumn(
                    column.clone(),
                ));
            }
        }

        if self.logging.enabled && EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(ConfigValidationError::InvalidLogLevel(
                self.logging.level.clone(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Input and output both point to '{}'", .0.display())]
    SameInputAndOutput(PathBuf),

    #[error("Monetary column '{0}' is listed more than once")]
    DuplicateMonetaryColumn(String),

    #[error("Invalid log level: '{0}'")]
    InvalidLogLevel(String),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    monetary_columns: Option<Vec<String>>,
    text_columns: Option<Vec<String>>,
    trim_text_values: Option<bool>,
    preview_rows: Option<usize>,
    logging: Option<LoggingConfig>,
    log_level: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the raw CSV path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the cleaned CSV path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the list of monetary columns.
    pub fn monetary_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monetary_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of columns read as text.
    pub fn text_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable trimming of text cells.
    pub fn trim_text_values(mut self, trim: bool) -> Self {
        self.trim_text_values = Some(trim);
        self
    }

    /// Set how many cleaned rows are echoed to the log.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Replace the logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set only the log level, keeping the other logging defaults.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let mut logging = self.logging.unwrap_or_default();
        if let Some(level) = self.log_level {
            logging.level = level;
        }

        let config = PipelineConfig {
            input_path: self
                .input_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            monetary_columns: self
                .monetary_columns
                .unwrap_or_else(default_monetary_columns),
            text_columns: self.text_columns.unwrap_or_else(default_text_columns),
            trim_text_values: self.trim_text_values.unwrap_or(true),
            preview_rows: self.preview_rows.unwrap_or(5),
            logging,
        };

        config.validate()?;
        Ok(config)
    }
}
