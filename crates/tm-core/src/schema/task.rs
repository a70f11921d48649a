//! Background task kinds, statuses, and caller-visible snapshots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Declared kind of a background task.
///
/// The kind selects the one-letter prefix of the task id (`b1f04c2a`,
/// `a9e11d03`, ...) and nothing else; the executor treats all kinds the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// A shell invocation run to completion in the background.
    Bash,
    /// A nested agent run.
    Agent,
}

impl TaskKind {
    /// One-letter id prefix for this kind.
    pub fn prefix(&self) -> char {
        match self {
            TaskKind::Bash => 'b',
            TaskKind::Agent => 'a',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Bash => "bash",
            TaskKind::Agent => "agent",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized task kind.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown task kind '{0}' (expected 'bash' or 'agent')")]
pub struct UnknownTaskKind(pub String);

impl FromStr for TaskKind {
    type Err = UnknownTaskKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(TaskKind::Bash),
            "agent" => Ok(TaskKind::Agent),
            other => Err(UnknownTaskKind(other.to_string())),
        }
    }
}

/// Lifecycle status of a background task.
///
/// `Running` is the only non-terminal status. Terminal statuses are
/// permanent: once a task completes, errors, or is stopped, no later
/// event may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Error,
    Stopped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
            TaskStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-visible view of a background task.
///
/// The executor never hands out references into its registry; every poll
/// returns a fresh snapshot. `output` is populated only in terminal
/// states: the work's result on completion, the failure detail on error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Task id; the first character encodes the kind.
    pub id: String,

    pub kind: TaskKind,

    pub status: TaskStatus,

    /// Result payload, present only once the task is terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// ISO 8601 UTC timestamp of when the task was scheduled.
    pub created_at: String,
}
