use crate::pipeline::PipelineState;
use crate::quality::MissingValueReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of a successful cleaning run.
///
/// Serialized as-is by the CLI's `--json` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Raw CSV the run started from (`None` when an in-memory table was given).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<PathBuf>,
    /// Where the cleaned CSV was written.
    pub output_path: PathBuf,

    pub rows: usize,
    pub columns: usize,

    /// Columns converted from currency text to Float64.
    pub monetary_columns: Vec<String>,
    /// `(before, after)` for each header that had stray whitespace.
    pub renamed_headers: Vec<(String, String)>,
    /// Text cells whose surrounding whitespace was removed.
    pub trimmed_values: usize,
    /// `(column, dtype)` after cleaning.
    pub column_types: Vec<(String, String)>,
    /// Missing cells per column after cleaning.
    pub missing_values: MissingValueReport,

    pub final_state: PipelineState,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
}

impl PipelineResult {
    /// dtype of `column` after cleaning, if present.
    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.column_types
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, dtype)| dtype.as_str())
    }
}
