//! Schema types for background tasks and team messaging
//!
//! Persisted types (`Message`, `TeamConfig`) preserve unknown JSON fields
//! for forward compatibility; in-memory snapshot types do not need to.

mod message;
mod notification;
mod task;
mod team_config;

pub use message::{Message, MessageType, UnknownMessageType};
pub use notification::NotificationEvent;
pub use task::{TaskKind, TaskSnapshot, TaskStatus, UnknownTaskKind};
pub use team_config::{TeamConfig, TeamMember};
