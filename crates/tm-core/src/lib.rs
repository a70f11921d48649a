//! Core library for taskmate
//!
//! taskmate is the systems core behind a tool-using agent loop: a
//! background execution engine that runs opaque units of work
//! concurrently, and a mailbox layer that lets independently running
//! teammates exchange typed messages with exactly-once-consume semantics.
//!
//! The two halves:
//! - [`exec`]: schedule work, poll results (blocking or not), request
//!   cooperative stops, drain completion notifications
//! - [`team`] + [`io`]: team/teammate lifecycle over per-teammate
//!   append-only, line-delimited mailbox stores on disk
//!
//! Both are explicit context objects owned by the calling loop; nothing
//! in this crate holds process-global mutable state.

pub mod config;
pub mod exec;
pub mod home;
pub mod io;
pub mod logging;
pub mod schema;
pub mod team;

pub use exec::{BackgroundExecutor, CancellationToken, NotificationBus, TaskError};
pub use schema::{
    Message, MessageType, NotificationEvent, TaskKind, TaskSnapshot, TaskStatus, TeamConfig,
    TeamMember,
};
pub use team::{CreateOutcome, TeamDirectory, TeamError, Teammate};
