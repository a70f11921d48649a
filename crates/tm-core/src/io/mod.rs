//! Atomic file I/O for teammate mailboxes
//!
//! Each mailbox is an append-only, line-delimited JSON store on disk, so
//! messages sent while the recipient is not polling survive until its next
//! inbox check. Key pieces:
//!
//! - **File locking**: advisory locks with exponential backoff retry
//! - **Append**: one fsynced JSON line per message, in send order
//! - **Read-and-clear**: a single atomic consume under the mailbox lock

pub mod error;
pub mod lock;
pub mod mailbox;

// Re-export primary API
pub use error::MailboxError;
pub use mailbox::{append_message, drain_messages, pending_count};
