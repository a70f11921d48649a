//! Mailbox message schema for teammate communication

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of recognized message types.
///
/// A send with any other type is rejected before the target mailbox is
/// touched. The set covers the coordination primitives teammates need:
/// free-form text, a work request, its reply, a one-to-many announcement,
/// and a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Free-form text between teammates.
    Message,
    /// Asks the recipient to do something and reply.
    Request,
    /// Reply to an earlier request.
    Response,
    /// Announcement fanned out to every teammate.
    Broadcast,
    /// Progress or state report, no reply expected.
    Status,
}

impl MessageType {
    pub const ALL: [MessageType; 5] = [
        MessageType::Message,
        MessageType::Request,
        MessageType::Response,
        MessageType::Broadcast,
        MessageType::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Message => "message",
            MessageType::Request => "request",
            MessageType::Response => "response",
            MessageType::Broadcast => "broadcast",
            MessageType::Status => "status",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a message type outside the recognized set.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown message type '{0}' (valid types: message, request, response, broadcast, status)")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageType::Message),
            "request" => Ok(MessageType::Request),
            "response" => Ok(MessageType::Response),
            "broadcast" => Ok(MessageType::Broadcast),
            "status" => Ok(MessageType::Status),
            other => Err(UnknownMessageType(other.to_string())),
        }
    }
}

/// Message in a teammate's mailbox
///
/// Stored as one JSON object per line in the teammate's `.jsonl` mailbox
/// file. A message exists unread from the moment it is appended until the
/// owning teammate's next inbox check consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Sender identity (teammate name or the lead's identity).
    pub from: String,

    /// One of the five recognized message types.
    #[serde(rename = "type")]
    pub msg_type: MessageType,

    /// Message content (markdown supported).
    pub content: String,

    /// ISO 8601 UTC timestamp
    pub timestamp: String,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_parse_all() {
        for t in MessageType::ALL {
            assert_eq!(t.as_str().parse::<MessageType>().unwrap(), t);
        }
    }

    #[test]
    fn test_message_type_rejects_unknown() {
        let err = "bogus".parse::<MessageType>().unwrap_err();
        assert_eq!(err, UnknownMessageType("bogus".to_string()));
        assert!(err.to_string().contains("valid types"));
    }

    #[test]
    fn test_message_roundtrip_minimal() {
        let json = r#"{
            "from": "team-lead",
            "type": "message",
            "content": "Start on the parser module",
            "timestamp": "2026-08-08T09:12:00Z"
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.from, "team-lead");
        assert_eq!(msg.msg_type, MessageType::Message);
        assert_eq!(msg.content, "Start on the parser module");

        let serialized = serde_json::to_string(&msg).unwrap();
        let reparsed: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed.msg_type, MessageType::Message);
        assert_eq!(reparsed.content, msg.content);
    }

    #[test]
    fn test_message_serializes_type_field_name() {
        let msg = Message {
            from: "worker".to_string(),
            msg_type: MessageType::Response,
            content: "done".to_string(),
            timestamp: "2026-08-08T09:13:00Z".to_string(),
            unknown_fields: HashMap::new(),
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "response");
        assert!(value.get("msg_type").is_none());
    }

    #[test]
    fn test_message_roundtrip_with_unknown_fields() {
        let json = r#"{
            "from": "worker",
            "type": "status",
            "content": "halfway there",
            "timestamp": "2026-08-08T09:14:00Z",
            "priority": "high",
            "futureFeature": {"nested": true}
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.unknown_fields.len(), 2);
        assert!(msg.unknown_fields.contains_key("priority"));

        let serialized = serde_json::to_string(&msg).unwrap();
        let reparsed: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed.unknown_fields.len(), 2);
    }
}
