//! Tool-call contract declarations.
//!
//! Each tool declares a name, a textual description, and a structured
//! input schema with named, typed fields, some marked required. The
//! hosting agent loop forwards these verbatim to its model API and routes
//! calls back through [`crate::dispatch`].

use serde_json::{Value, json};

/// All tools exposed by the core.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "Task",
            "description": "Launch a unit of work in the background and return its task id immediately. Use TaskOutput to retrieve the result later.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "What to run: a shell command for bash tasks, a prompt for agent tasks"
                    },
                    "task_type": {
                        "type": "string",
                        "enum": ["bash", "agent"],
                        "description": "Kind of work; selects the task id prefix"
                    }
                },
                "required": ["command", "task_type"]
            }
        }),
        json!({
            "name": "TaskOutput",
            "description": "Poll a background task's status. With block=true, waits until the task finishes or the timeout elapses; a timeout while still running returns status 'running'.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "Id returned by Task"
                    },
                    "block": {
                        "type": "boolean",
                        "description": "Wait for completion instead of returning a snapshot (default false)"
                    },
                    "timeout_ms": {
                        "type": "integer",
                        "description": "Maximum time to wait when blocking, in milliseconds (default 30000)"
                    }
                },
                "required": ["task_id"]
            }
        }),
        json!({
            "name": "TaskStop",
            "description": "Request cancellation of a running background task. The stop is cooperative: the task reports 'stopped' immediately, but the underlying work halts only if it observes its cancellation flag.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "task_id": {
                        "type": "string",
                        "description": "Id returned by Task"
                    }
                },
                "required": ["task_id"]
            }
        }),
        json!({
            "name": "TeamCreate",
            "description": "Create a named team to coordinate teammates. Creating a name that already exists is reported, not an error.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Team name, unique across the directory"
                    }
                },
                "required": ["name"]
            }
        }),
        json!({
            "name": "TeamDelete",
            "description": "Delete a team and every teammate's mailbox with it.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Team to delete"
                    }
                },
                "required": ["name"]
            }
        }),
        json!({
            "name": "SendMessage",
            "description": "Append a typed message to a teammate's mailbox. The teammate receives it on its next inbox check.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "target": {
                        "type": "string",
                        "description": "Recipient teammate name"
                    },
                    "content": {
                        "type": "string",
                        "description": "Message content"
                    },
                    "type": {
                        "type": "string",
                        "enum": ["message", "request", "response", "broadcast", "status"],
                        "description": "Message type"
                    },
                    "team": {
                        "type": "string",
                        "description": "Team the recipient belongs to (defaults to the configured team)"
                    }
                },
                "required": ["target", "content", "type"]
            }
        }),
        json!({
            "name": "TeamStatus",
            "description": "Report team rosters and pending-message counts, for one team or all of them.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Team to report on; omit for all teams"
                    }
                },
                "required": []
            }
        }),
    ]
}

/// The subset handed to spawned teammates: everything except team
/// lifecycle, which stays with the lead.
pub fn teammate_tool_definitions() -> Vec<Value> {
    tool_definitions()
        .into_iter()
        .filter(|tool| {
            !matches!(
                tool.get("name").and_then(Value::as_str),
                Some("TeamCreate") | Some("TeamDelete")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_declares_schema() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 7);

        for tool in &tools {
            assert!(tool.get("name").and_then(Value::as_str).is_some());
            assert!(tool.get("description").and_then(Value::as_str).is_some());
            let schema = tool.get("input_schema").unwrap();
            assert_eq!(schema["type"], "object");
            assert!(schema.get("required").is_some());
        }
    }

    #[test]
    fn test_required_surface_is_present() {
        let names: Vec<String> = tool_definitions()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        for expected in [
            "Task",
            "TaskOutput",
            "TaskStop",
            "TeamCreate",
            "TeamDelete",
            "SendMessage",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_teammate_tools_exclude_team_lifecycle() {
        let tools = teammate_tool_definitions();
        let names: Vec<&str> = tools
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();

        assert!(names.contains(&"SendMessage"));
        assert!(!names.contains(&"TeamCreate"));
        assert!(!names.contains(&"TeamDelete"));
        assert!(names.len() < tool_definitions().len());
    }
}
