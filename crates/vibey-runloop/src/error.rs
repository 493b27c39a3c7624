//! Error types for the run loop.

use thiserror::Error;

use vibey_protocols::SourceError;

/// Errors raised outside per-post processing.
#[derive(Debug, Error)]
pub enum RunLoopError {
    /// Discovery, scrolling or refreshing the feed failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Signal handler setup failed.
    #[error("Signal setup failed: {0}")]
    SignalSetup(String),
}

/// Result type for run loop operations.
pub type RunLoopResult<T> = Result<T, RunLoopError>;
