//! Error types for team directory operations

use crate::io::MailboxError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::team::TeamDirectory`] operations.
///
/// Every variant is a structural, per-operation failure; none of them
/// leaves the directory unusable.
#[derive(Error, Debug)]
pub enum TeamError {
    /// No team registered under this name
    #[error("team '{name}' not found")]
    TeamNotFound { name: String },

    /// The team exists but has no such teammate
    #[error("no teammate '{name}' in team '{team}'")]
    TeammateNotFound { team: String, name: String },

    /// Teammate names are unique within a team
    #[error("teammate '{name}' already exists in team '{team}'")]
    TeammateAlreadyExists { team: String, name: String },

    /// The message type is outside the recognized set; no mailbox was touched
    #[error(transparent)]
    InvalidMessageType(#[from] crate::schema::UnknownMessageType),

    /// Mailbox store failure
    #[error(transparent)]
    Mailbox(#[from] MailboxError),

    /// Filesystem failure on team state
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Roster serialization failure
    #[error("JSON error for {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
