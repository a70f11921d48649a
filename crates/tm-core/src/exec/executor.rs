//! Background task executor
//!
//! Every scheduled unit of work runs on its own OS thread; the executor's
//! shared state (task registry, notification queue) sits behind a mutex
//! paired with a condition variable that wakes blocked pollers on each
//! terminal transition. The work itself is opaque to the executor: it
//! receives a [`CancellationToken`] it may poll, and nothing more.

use crate::exec::cancel::CancellationToken;
use crate::exec::error::TaskError;
use crate::exec::notify::NotificationBus;
use crate::exec::registry::{TaskRecord, TaskRegistry};
use crate::schema::{NotificationEvent, TaskKind, TaskSnapshot, TaskStatus};
use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Summaries are clipped to this many characters for notifications.
const SUMMARY_MAX_CHARS: usize = 60;

#[derive(Default)]
struct Inner {
    registry: Mutex<TaskRegistry>,
    done: Condvar,
    bus: NotificationBus,
}

/// Handle to the background execution engine.
///
/// Cloning is cheap and every clone drives the same registry and
/// notification queue, so worker threads can report back through their own
/// handle. Construct one per hosting loop; there is no process-global
/// executor.
#[derive(Clone, Default)]
pub struct BackgroundExecutor {
    inner: Arc<Inner>,
}

impl BackgroundExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_registry(&self) -> MutexGuard<'_, TaskRegistry> {
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Launch an opaque unit of work in the background.
    ///
    /// Returns the fresh task id immediately; the task is observable as
    /// `running` from that moment. The work receives a cancellation token
    /// it may poll (see [`CancellationToken`] for the cooperative-stop
    /// contract). A work error (or panic) is captured as task status
    /// `error` with the failure detail as output; it never propagates out
    /// of a poll call.
    pub fn schedule<F>(&self, kind: TaskKind, work: F) -> Result<String, TaskError>
    where
        F: FnOnce(CancellationToken) -> anyhow::Result<String> + Send + 'static,
    {
        let token = CancellationToken::new();
        let id = {
            let mut registry = self.lock_registry();
            let id = registry.allocate_id(kind);
            registry.insert(
                id.clone(),
                TaskRecord {
                    kind,
                    status: TaskStatus::Running,
                    output: None,
                    created_at: Utc::now().to_rfc3339(),
                    cancel: token.clone(),
                },
            );
            id
        };

        let executor = self.clone();
        let task_id = id.clone();
        let spawn_result = thread::Builder::new()
            .name(format!("taskmate-{id}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(move || work(token)));
                match result {
                    Ok(Ok(output)) => {
                        executor.finish(&task_id, TaskStatus::Completed, Some(output));
                    }
                    Ok(Err(err)) => {
                        executor.finish(&task_id, TaskStatus::Error, Some(format!("{err:#}")));
                    }
                    Err(_) => {
                        executor.finish(&task_id, TaskStatus::Error, Some("task panicked".to_string()));
                    }
                }
            });

        if let Err(source) = spawn_result {
            self.lock_registry().remove(&id);
            return Err(TaskError::Spawn { source });
        }

        tracing::debug!(task_id = %id, kind = %kind, "scheduled background task");
        Ok(id)
    }

    /// Poll a task's status, optionally blocking until it is terminal.
    ///
    /// Non-blocking (`block == false`): returns an immediate snapshot and
    /// ignores `timeout`. Blocking: suspends the calling thread on the
    /// completion signal until the task reaches a terminal state or the
    /// timeout elapses. An elapsed timeout on a still-running task
    /// returns the `running` snapshot, which is a defined outcome, not an
    /// error.
    ///
    /// # Errors
    ///
    /// `TaskError::NotFound` when no task with this id was ever scheduled.
    pub fn get_output(
        &self,
        id: &str,
        block: bool,
        timeout: Duration,
    ) -> Result<TaskSnapshot, TaskError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut registry = self.lock_registry();

        loop {
            let snapshot = registry.snapshot(id).ok_or_else(|| TaskError::NotFound {
                id: id.to_string(),
            })?;
            if snapshot.status.is_terminal() || !block {
                return Ok(snapshot);
            }

            let wait = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if remaining > Duration::ZERO => remaining,
                    // Timeout elapsed while still running.
                    _ => return Ok(snapshot),
                },
                // Timeout too large to represent; wait in slices.
                None => Duration::from_secs(60),
            };

            let (guard, _) = self
                .inner
                .done
                .wait_timeout(registry, wait)
                .unwrap_or_else(PoisonError::into_inner);
            registry = guard;
        }
    }

    /// Request cancellation of a running task.
    ///
    /// Raises the task's cancellation flag and reports `stopped`
    /// immediately. The stop is cooperative: if the work never observes
    /// its token, the underlying thread keeps executing even though the
    /// task's reported status is now `stopped`. An already-terminal task
    /// is returned unchanged; terminal states are permanent.
    pub fn stop_task(&self, id: &str) -> Result<TaskSnapshot, TaskError> {
        let mut registry = self.lock_registry();

        let already_terminal = match registry.get(id) {
            None => {
                return Err(TaskError::NotFound {
                    id: id.to_string(),
                });
            }
            Some(record) => record.status.is_terminal(),
        };

        if !already_terminal {
            if let Some(record) = registry.get_mut(id) {
                record.cancel.cancel();
                record.status = TaskStatus::Stopped;
            }
            self.inner.bus.push(NotificationEvent {
                task_id: id.to_string(),
                status: TaskStatus::Stopped,
                summary: summarize(TaskStatus::Stopped, None),
            });
            tracing::debug!(task_id = %id, "stop requested; cancellation is cooperative");
        }

        let snapshot = registry.snapshot(id).ok_or_else(|| TaskError::NotFound {
            id: id.to_string(),
        })?;
        drop(registry);

        if !already_terminal {
            self.inner.done.notify_all();
        }
        Ok(snapshot)
    }

    /// Atomically drain pending completion notifications, oldest first.
    pub fn drain_notifications(&self) -> Vec<NotificationEvent> {
        self.inner.bus.drain()
    }

    /// The bus completions are enqueued on.
    pub fn notifications(&self) -> &NotificationBus {
        &self.inner.bus
    }

    /// Record a terminal transition exactly once.
    ///
    /// No-ops when the task is already terminal, so a completion racing an
    /// earlier stop neither overwrites the status nor emits a second
    /// notification.
    fn finish(&self, id: &str, status: TaskStatus, output: Option<String>) {
        let mut registry = self.lock_registry();
        let Some(record) = registry.get_mut(id) else {
            return;
        };
        if record.status.is_terminal() {
            return;
        }
        record.status = status;
        record.output = output;

        // Transition and enqueue happen under the registry lock so events
        // come out of the bus in completion order.
        let summary = summarize(status, record.output.as_deref());
        self.inner.bus.push(NotificationEvent {
            task_id: id.to_string(),
            status,
            summary,
        });
        drop(registry);

        self.inner.done.notify_all();
        tracing::debug!(task_id = %id, status = %status, "background task reached terminal state");
    }
}

/// Build the short notification summary for a terminal transition.
fn summarize(status: TaskStatus, output: Option<&str>) -> String {
    let Some(text) = output else {
        return status.to_string();
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return status.to_string();
    }
    let head: String = trimmed.chars().take(SUMMARY_MAX_CHARS).collect();
    if trimmed.chars().count() > SUMMARY_MAX_CHARS {
        format!("{status}: {head}...")
    } else {
        format!("{status}: {head}")
    }
}
