//! Custom error types for the cleaning pipeline.
//!
//! Every failure is fatal to a run. The variants name the offending path,
//! column or row so the top-level log line is enough to locate the problem.
//!
//! Errors are serializable as `{code, message}` so a JSON summary can carry
//! them alongside successful results.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input path does not resolve to a regular file.
    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input file exists but could not be read or parsed.
    #[error("Failed to load '{}': {reason}", .path.display())]
    LoadFailure { path: PathBuf, reason: String },

    /// A requested column is absent from the table.
    #[error("Column '{0}' not found in dataset")]
    UnknownColumn(String),

    /// Two columns share a name after header normalization.
    #[error("Column '{0}' appears more than once after trimming headers")]
    DuplicateColumn(String),

    /// A monetary cell could not be parsed once currency symbols were stripped.
    #[error("Malformed monetary value in column '{column}' at row {row}: {}", display_cell(.value))]
    MalformedMonetaryValue {
        column: String,
        row: usize,
        value: Option<String>,
    },

    /// The cleaned table could not be persisted.
    #[error("Failed to write '{}': {reason}", .path.display())]
    WriteFailure { path: PathBuf, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cost analysis over the cleaned table failed.
    #[error("Failed to analyze costs: {0}")]
    AnalysisFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

fn display_cell(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{:?}", v),
        None => "<missing>".to_string(),
    }
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::LoadFailure { .. } => "LOAD_FAILURE",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::MalformedMonetaryValue { .. } => "MALFORMED_MONETARY_VALUE",
            Self::WriteFailure { .. } => "WRITE_FAILURE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::AnalysisFailed(_) => "ANALYSIS_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Unwrap any context layers and return the underlying error.
    pub fn root(&self) -> &CleaningError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = CleaningError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(
            CleaningError::UnknownColumn("Average Total Payments".to_string()).error_code(),
            "UNKNOWN_COLUMN"
        );
    }

    #[test]
    fn test_not_found_names_path() {
        let err = CleaningError::NotFound {
            path: PathBuf::from("./data/healthcare_cost.csv"),
        };
        assert!(err.to_string().contains("./data/healthcare_cost.csv"));
    }

    #[test]
    fn test_malformed_value_message() {
        let err = CleaningError::MalformedMonetaryValue {
            column: "Average Covered Charges".to_string(),
            row: 3,
            value: Some("N/A".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Average Covered Charges"));
        assert!(msg.contains("row 3"));
        assert!(msg.contains("\"N/A\""));

        let missing = CleaningError::MalformedMonetaryValue {
            column: "Average Covered Charges".to_string(),
            row: 0,
            value: None,
        };
        assert!(missing.to_string().contains("<missing>"));
    }

    #[test]
    fn test_error_serialization() {
        let error = CleaningError::UnknownColumn("Zip".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNKNOWN_COLUMN"));
        assert!(json.contains("Zip"));
    }

    #[test]
    fn test_with_context() {
        let error =
            CleaningError::UnknownColumn("State".to_string()).with_context("During analysis");
        assert!(error.to_string().contains("During analysis"));
        assert_eq!(error.error_code(), "UNKNOWN_COLUMN");
        assert!(matches!(error.root(), CleaningError::UnknownColumn(_)));
    }
}
