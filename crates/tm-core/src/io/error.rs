//! Error types for mailbox I/O operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during mailbox operations
#[derive(Error, Debug)]
pub enum MailboxError {
    /// Failed to acquire the mailbox lock after multiple retries
    #[error("Failed to acquire lock on {path} after {retries} retries")]
    LockTimeout { path: PathBuf, retries: u32 },

    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize a message record
    #[error("JSON error for {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
