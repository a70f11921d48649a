//! Line-delimited mailbox store with atomic append and read-and-clear
//!
//! Each teammate's mailbox is a `.jsonl` file: one JSON-encoded [`Message`]
//! per line, appended in send order. All operations on a mailbox take the
//! sibling `.lock` file first, so an append and a drain on the same mailbox
//! are mutually exclusive: a message sent concurrently with an in-flight
//! check is either fully included in that check's result or fully deferred
//! to the next one. Different mailboxes share nothing and need no
//! cross-locking.

use crate::io::{error::MailboxError, lock::acquire_lock};
use crate::schema::Message;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lock acquisition retries for mailbox operations.
const LOCK_MAX_RETRIES: u32 = 5;

fn lock_path_for(mailbox_path: &Path) -> PathBuf {
    mailbox_path.with_extension("lock")
}

fn io_err(path: &Path, source: std::io::Error) -> MailboxError {
    MailboxError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Append a message to a mailbox store
///
/// Acquires the mailbox lock, then appends one serialized JSON line and
/// fsyncs. The parent directory is created if missing, so a send can
/// outlive a recipient that has never polled.
///
/// # Errors
///
/// Returns `MailboxError` for lock timeout, I/O errors, or serialization
/// failures. On any error the store is left as it was.
pub fn append_message(mailbox_path: &Path, message: &Message) -> Result<(), MailboxError> {
    if let Some(parent) = mailbox_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let _lock = acquire_lock(&lock_path_for(mailbox_path), LOCK_MAX_RETRIES)?;

    let mut line = serde_json::to_string(message).map_err(|e| MailboxError::Json {
        path: mailbox_path.to_path_buf(),
        source: e,
    })?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(mailbox_path)
        .map_err(|e| io_err(mailbox_path, e))?;

    file.write_all(line.as_bytes())
        .map_err(|e| io_err(mailbox_path, e))?;
    file.sync_all().map_err(|e| io_err(mailbox_path, e))?;

    Ok(())
}

/// Atomically consume every message in a mailbox store
///
/// Acquires the mailbox lock, reads all stored lines in file (= send)
/// order, truncates the store to empty, and returns the messages. A second
/// drain with no intervening append returns an empty vector. No message is
/// ever returned twice, and no message appended concurrently is lost: the
/// appender is either serialized before the read (included) or after the
/// truncation (kept for the next drain).
///
/// A line that fails to parse (e.g. a torn trailing line left by a writer
/// that crashed mid-append) is skipped with a warning rather than
/// poisoning the whole mailbox.
pub fn drain_messages(mailbox_path: &Path) -> Result<Vec<Message>, MailboxError> {
    let _lock = acquire_lock(&lock_path_for(mailbox_path), LOCK_MAX_RETRIES)?;

    if !mailbox_path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(mailbox_path).map_err(|e| io_err(mailbox_path, e))?;
    let messages = parse_lines(mailbox_path, &content);

    // Read-and-clear is one critical section under the mailbox lock.
    let file = fs::File::create(mailbox_path).map_err(|e| io_err(mailbox_path, e))?;
    file.sync_all().map_err(|e| io_err(mailbox_path, e))?;

    Ok(messages)
}

/// Count stored messages without consuming them
pub fn pending_count(mailbox_path: &Path) -> Result<usize, MailboxError> {
    let _lock = acquire_lock(&lock_path_for(mailbox_path), LOCK_MAX_RETRIES)?;

    if !mailbox_path.exists() {
        return Ok(0);
    }

    let content = fs::read_to_string(mailbox_path).map_err(|e| io_err(mailbox_path, e))?;
    Ok(parse_lines(mailbox_path, &content).len())
}

fn parse_lines(mailbox_path: &Path, content: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Message>(line) {
            Ok(msg) => messages.push(msg),
            Err(e) => {
                tracing::warn!(
                    path = %mailbox_path.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping unreadable mailbox line"
                );
            }
        }
    }
    messages
}
