//! Terminal-state notification events

use super::TaskStatus;
use serde::{Deserialize, Serialize};

/// One-time event emitted when a background task reaches a terminal state.
///
/// Produced exactly once per task over its lifetime, in completion order
/// (not schedule order), and consumed by at most one notification drain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Id of the task that transitioned.
    pub task_id: String,

    /// The terminal status the task reached.
    pub status: TaskStatus,

    /// Short human-readable summary of the outcome.
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serializes_status() {
        let event = NotificationEvent {
            task_id: "b1f04c2a".to_string(),
            status: TaskStatus::Completed,
            summary: "done".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["task_id"], "b1f04c2a");
        assert_eq!(value["status"], "completed");
    }
}
