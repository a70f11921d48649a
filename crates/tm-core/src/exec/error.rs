//! Error types for the background executor

use thiserror::Error;

/// Errors returned by executor operations.
///
/// A failure inside the scheduled work itself is never surfaced here; it is
/// captured as task status `error` with the failure detail as output.
#[derive(Error, Debug)]
pub enum TaskError {
    /// No task with the given id was ever scheduled
    #[error("no background task with id '{id}'")]
    NotFound { id: String },

    /// The OS refused to launch the worker thread
    #[error("failed to launch background thread: {source}")]
    Spawn { source: std::io::Error },
}
