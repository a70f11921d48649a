//! FIFO queue of terminal-state notifications

use crate::schema::NotificationEvent;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Queue of task-completion events, drained atomically.
///
/// The executor pushes exactly one event per task-terminal-transition, in
/// completion order. [`NotificationBus::drain`] empties and returns the
/// queue as one atomic step: no event is ever split across two drains or
/// delivered twice, and a drain with nothing pending returns empty.
#[derive(Debug, Default)]
pub struct NotificationBus {
    queue: Mutex<VecDeque<NotificationEvent>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: NotificationEvent) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
    }

    /// Atomically empty the queue and return its contents in arrival order.
    pub fn drain(&self) -> Vec<NotificationEvent> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TaskStatus;

    fn event(task_id: &str) -> NotificationEvent {
        NotificationEvent {
            task_id: task_id.to_string(),
            status: TaskStatus::Completed,
            summary: "done".to_string(),
        }
    }

    #[test]
    fn test_drain_returns_arrival_order() {
        let bus = NotificationBus::new();
        bus.push(event("b1"));
        bus.push(event("a2"));
        bus.push(event("b3"));

        let events = bus.drain();
        let ids: Vec<&str> = events.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(ids, ["b1", "a2", "b3"]);
    }

    #[test]
    fn test_second_drain_is_empty() {
        let bus = NotificationBus::new();
        bus.push(event("b1"));

        assert_eq!(bus.drain().len(), 1);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_pending_does_not_consume() {
        let bus = NotificationBus::new();
        bus.push(event("b1"));
        bus.push(event("b2"));

        assert_eq!(bus.pending(), 2);
        assert_eq!(bus.drain().len(), 2);
        assert_eq!(bus.pending(), 0);
    }
}
