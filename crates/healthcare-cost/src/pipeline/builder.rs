//! Cleaning pipeline driver.
//!
//! This module provides the `Pipeline` struct and builder that compose the
//! loader, cleaners, integrity checker and writer in a fixed order.

use crate::cleaner::{normalize_headers, parse_monetary_columns, trim_text_values};
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::Result;
use crate::io::{load_table_with, save_table};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineState, ProgressReporter, ProgressUpdate,
};
use crate::quality::IntegrityChecker;
use crate::types::PipelineResult;
use crate::utils::{column_types, preview_lines};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use healthcare_cost::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(
///         PipelineConfig::builder()
///             .input_path("data/healthcare_cost.csv")
///             .output_path("data/healthcare_cost_cleaned.csv")
///             .build()?,
///     )
///     .build()?
///     .run()?;
///
/// println!("Wrote {} rows to {}", result.rows, result.output_path.display());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

/// Walks [`PipelineState`] forward one step at a time.
struct StateMachine<'a> {
    current: PipelineState,
    reporter: Option<&'a dyn ProgressReporter>,
}

impl<'a> StateMachine<'a> {
    fn new(start: PipelineState, reporter: Option<&'a dyn ProgressReporter>) -> Self {
        Self {
            current: start,
            reporter,
        }
    }

    fn advance(&mut self, message: impl Into<String>) -> PipelineState {
        if let Some(next) = self.current.next() {
            self.current = next;
        }
        let message = message.into();
        debug!("[{}] {}", self.current.display_name(), message);
        if let Some(reporter) = self.reporter {
            reporter.report(ProgressUpdate::new(self.current, message));
        }
        self.current
    }
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Output path, as configured.
    pub fn output_path(&self) -> &Path {
        &self.config.output_path
    }

    /// Run the whole pipeline: load the configured input, clean it and save
    /// it to the configured output.
    ///
    /// # Errors
    ///
    /// Any step's error aborts the run immediately; the output file is only
    /// created once every earlier step has succeeded.
    pub fn run(&self) -> Result<PipelineResult> {
        self.with_logging(|| {
            let start_time = Instant::now();
            let mut machine = StateMachine::new(PipelineState::Start, self.reporter());
            info!("Starting cleaning pipeline...");

            let outcome = load_table_with(&self.config.input_path, &self.config.text_columns)
                .and_then(|df| {
                    machine.advance(format!(
                        "Loaded {} rows x {} columns from {}",
                        df.height(),
                        df.width(),
                        self.config.input_path.display()
                    ));
                    self.clean_and_save(df, &mut machine, start_time)
                });

            self.finish(outcome.map(|mut result| {
                result.input_path = Some(self.config.input_path.clone());
                result
            }))
        })
    }

    /// Clean an already-loaded table and save it to the configured output.
    ///
    /// The run starts in [`PipelineState::Loaded`]; `input_path` is left unset
    /// in the result.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        self.with_logging(|| {
            let start_time = Instant::now();
            let mut machine = StateMachine::new(PipelineState::Loaded, self.reporter());
            info!("Cleaning in-memory table ({} rows)...", df.height());

            let outcome = self.clean_and_save(df, &mut machine, start_time);
            self.finish(outcome)
        })
    }

    fn with_logging<T>(&self, f: impl FnOnce() -> T) -> T {
        if self.config.logging.enabled {
            tracing::subscriber::with_default(self.config.logging.subscriber(), f)
        } else {
            f()
        }
    }

    fn reporter(&self) -> Option<&dyn ProgressReporter> {
        self.progress_reporter.as_deref()
    }

    fn finish(&self, outcome: Result<PipelineResult>) -> Result<PipelineResult> {
        match outcome {
            Ok(result) => {
                info!(
                    "Pipeline completed in {}ms: {} rows written to {}",
                    result.duration_ms,
                    result.rows,
                    result.output_path.display()
                );
                Ok(result)
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                if let Some(reporter) = self.reporter() {
                    reporter.report(ProgressUpdate::failed(e.to_string()));
                }
                Err(e)
            }
        }
    }

    fn clean_and_save(
        &self,
        mut df: DataFrame,
        machine: &mut StateMachine<'_>,
        start_time: Instant,
    ) -> Result<PipelineResult> {
        let renamed_headers = normalize_headers(&mut df)?;
        machine.advance(format!("Trimmed {} column names", renamed_headers.len()));

        let trimmed_values = if self.config.trim_text_values {
            trim_text_values(&mut df)?
        } else {
            debug!("Text value trimming disabled");
            0
        };
        machine.advance(format!("Trimmed {} text values", trimmed_values));

        parse_monetary_columns(&mut df, &self.config.monetary_columns)?;
        machine.advance(format!(
            "Converted {} monetary columns",
            self.config.monetary_columns.len()
        ));

        let column_types = column_types(&df);
        info!("Updated data types:");
        for (name, dtype) in &column_types {
            info!("  {}: {}", name, dtype);
        }

        let missing_values = IntegrityChecker::count_missing(&df);
        if missing_values.is_complete() {
            info!("No missing values in the dataset");
        } else {
            info!("Missing values in the dataset:");
            for column in &missing_values.columns {
                info!("  {}: {}", column.column, column.missing);
            }
        }
        machine.advance(format!(
            "{} missing values across {} columns",
            missing_values.total(),
            missing_values.columns_with_missing().len()
        ));

        if self.config.preview_rows > 0 {
            let preview = preview_lines(&df, self.config.preview_rows);
            info!("First {} rows of the cleaned dataset:", preview.len());
            for line in &preview {
                info!("  {}", line);
            }
        }

        save_table(&mut df, &self.config.output_path)?;
        machine.advance(format!("Saved {}", self.config.output_path.display()));

        let final_state = machine.advance("Cleaning complete");

        Ok(PipelineResult {
            input_path: None,
            output_path: self.config.output_path.clone(),
            rows: df.height(),
            columns: df.width(),
            monetary_columns: self.config.monetary_columns.clone(),
            renamed_headers,
            trimmed_values,
            column_types,
            missing_values,
            final_state,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving state transitions.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// ```rust,ignore
    /// let pipeline = Pipeline::builder()
    ///     .on_progress(|update| println!("{}: {}", update.state.display_name(), update.message))
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::sync::Mutex;

    fn quiet_config(dir: &tempfile::TempDir) -> PipelineConfig {
        PipelineConfig::builder()
            .input_path(dir.path().join("raw.csv"))
            .output_path(dir.path().join("clean.csv"))
            .monetary_columns(["Average Total Payments"])
            .logging(LoggingConfig::disabled())
            .build()
            .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert!(pipeline.progress_reporter.is_none());
        assert!(pipeline.config().trim_text_values);
        assert_eq!(
            pipeline.output_path(),
            Path::new("./data/healthcare_cost_cleaned.csv")
        );
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = PipelineConfig::default();
        config.output_path = config.input_path.clone();

        let result = Pipeline::builder().config(config).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::SameInputAndOutput(_))
        ));
    }

    #[test]
    fn test_process_reports_every_state_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let states = Arc::new(Mutex::new(Vec::new()));
        let states_clone = states.clone();

        let df = df![
            "Provider State " => [" CA "],
            "Average Total Payments" => ["$1,000.00"],
        ]
        .unwrap();

        let result = Pipeline::builder()
            .config(quiet_config(&dir))
            .on_progress(move |update| states_clone.lock().unwrap().push(update.state))
            .build()
            .unwrap()
            .process(df)
            .unwrap();

        assert_eq!(result.final_state, PipelineState::Done);
        assert!(result.input_path.is_none());
        assert_eq!(
            *states.lock().unwrap(),
            vec![
                PipelineState::HeadersNormalized,
                PipelineState::ValuesTrimmed,
                PipelineState::MonetaryCleaned,
                PipelineState::Checked,
                PipelineState::Saved,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_process_failure_reports_failed_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let states = Arc::new(Mutex::new(Vec::new()));
        let states_clone = states.clone();
        let config = quiet_config(&dir);
        let output = config.output_path.clone();

        let df = df![
            "Average Total Payments" => ["N/A"],
        ]
        .unwrap();

        let result = Pipeline::builder()
            .config(config)
            .on_progress(move |update| states_clone.lock().unwrap().push(update.state))
            .build()
            .unwrap()
            .process(df);

        assert!(result.is_err());
        assert_eq!(
            states.lock().unwrap().last(),
            Some(&PipelineState::Failed)
        );
        assert!(!states.lock().unwrap().contains(&PipelineState::Saved));
        assert!(!output.exists());
    }

    #[test]
    fn test_state_machine_stays_put_at_terminal_state() {
        let mut machine = StateMachine::new(PipelineState::Saved, None);
        assert_eq!(machine.advance("done"), PipelineState::Done);
        assert_eq!(machine.advance("still done"), PipelineState::Done);
    }
}
