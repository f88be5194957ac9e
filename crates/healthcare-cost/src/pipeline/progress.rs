//! Pipeline states and progress reporting.
//!
//! A run walks a fixed, linear sequence of states:
//!
//! ```text
//! Start -> Loaded -> HeadersNormalized -> ValuesTrimmed -> MonetaryCleaned
//!       -> Checked -> Saved -> Done
//! ```
//!
//! Each transition follows exactly one cleaning step. There are no branches
//! and no way back; any error moves the run to `Failed`.
//!
//! # Example
//!
//! ```rust,ignore
//! use healthcare_cost::Pipeline;
//!
//! Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// States of a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has happened yet
    Start,
    /// Raw table read from disk
    Loaded,
    /// Column headers trimmed
    HeadersNormalized,
    /// Text cells trimmed (pass-through when disabled)
    ValuesTrimmed,
    /// Monetary columns converted to Float64
    MonetaryCleaned,
    /// Missing values counted
    Checked,
    /// Cleaned table written
    Saved,
    /// Run finished successfully
    Done,
    /// Run aborted with an error
    Failed,
}

impl PipelineState {
    /// The state that follows this one, or `None` for terminal states.
    pub fn next(&self) -> Option<PipelineState> {
        match self {
            Self::Start => Some(Self::Loaded),
            Self::Loaded => Some(Self::HeadersNormalized),
            Self::HeadersNormalized => Some(Self::ValuesTrimmed),
            Self::ValuesTrimmed => Some(Self::MonetaryCleaned),
            Self::MonetaryCleaned => Some(Self::Checked),
            Self::Checked => Some(Self::Saved),
            Self::Saved => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Returns a human-readable name for the state.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Loaded => "Loaded",
            Self::HeadersNormalized => "Headers Normalized",
            Self::ValuesTrimmed => "Values Trimmed",
            Self::MonetaryCleaned => "Monetary Columns Cleaned",
            Self::Checked => "Missing Values Checked",
            Self::Saved => "Saved",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }

    /// Overall progress (0.0 - 1.0) once this state is reached.
    pub fn progress(&self) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Loaded => 0.30,
            Self::HeadersNormalized => 0.40,
            Self::ValuesTrimmed => 0.50,
            Self::MonetaryCleaned => 0.70,
            Self::Checked => 0.80,
            Self::Saved => 0.95,
            Self::Done => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted on every state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// State just reached
    pub state: PipelineState,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing the step
    pub message: String,
}

impl ProgressUpdate {
    /// Creates an update for a state reached normally.
    pub fn new(state: PipelineState, message: impl Into<String>) -> Self {
        Self {
            state,
            progress: state.progress(),
            message: message.into(),
        }
    }

    /// Creates a failure update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(PipelineState::Failed, message)
    }
}

/// Trait for receiving progress updates from the pipeline.
pub trait ProgressReporter: Send + Sync {
    /// Called once per state transition.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
