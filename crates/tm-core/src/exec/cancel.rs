//! Cooperative cancellation token

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between a stop request and the running work.
///
/// Cancellation is cooperative and best-effort: the scheduled work MAY poll
/// [`CancellationToken::is_cancelled`] and wind down early, but nothing
/// forces it to. Work that ignores the token keeps executing in the
/// background even after its task reports "stopped". That asymmetry is
/// part of the executor's contract, not a gap to close with thread-kill
/// primitives.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the cancellation flag. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once a stop has been requested for the owning task.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
