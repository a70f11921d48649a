//! Routes tool calls into the core.
//!
//! Every handler turns structural failures (unknown tool, missing or
//! malformed arguments, unknown ids and names, a rejected message type)
//! into a descriptive error result the calling loop can branch on. Nothing
//! here panics or propagates an error upward, and the context stays fully
//! usable after any individual failure.

use crate::context::ToolContext;
use serde_json::Value;
use std::time::Duration;
use taskmate_core::{CreateOutcome, TaskKind};

/// Default wait for a blocking TaskOutput call.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Truncation suffix appended when a message is cut to the configured limit.
const TRUNCATION_SUFFIX: &str = " [...truncated]";

/// Result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: format!("Error: {}", text.into()),
            is_error: true,
        }
    }
}

/// Execute one tool call against the context.
pub fn dispatch(ctx: &ToolContext, name: &str, args: &Value) -> ToolOutput {
    let output = match name {
        "Task" => handle_task(ctx, args),
        "TaskOutput" => handle_task_output(ctx, args),
        "TaskStop" => handle_task_stop(ctx, args),
        "TeamCreate" => handle_team_create(ctx, args),
        "TeamDelete" => handle_team_delete(ctx, args),
        "SendMessage" => handle_send_message(ctx, args),
        "TeamStatus" => handle_team_status(ctx, args),
        other => ToolOutput::error(format!("unknown tool '{other}'")),
    };
    if output.is_error {
        tracing::debug!(tool = name, result = %output.text, "tool call failed");
    }
    output
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolOutput> {
    match args.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ToolOutput::error(format!(
            "missing required field '{key}'"
        ))),
    }
}

fn handle_task(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let command = match required_str(args, "command") {
        Ok(s) => s.to_string(),
        Err(e) => return e,
    };
    let kind: TaskKind = match required_str(args, "task_type") {
        Ok(s) => match s.parse() {
            Ok(kind) => kind,
            Err(e) => return ToolOutput::error(e.to_string()),
        },
        Err(e) => return e,
    };

    let runner = ctx.runner.clone();
    let scheduled = ctx
        .executor
        .schedule(kind, move |token| runner.run(kind, &command, &token));

    match scheduled {
        Ok(id) => ToolOutput::ok(format!("Background task {id} started ({kind})")),
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_task_output(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let task_id = match required_str(args, "task_id") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let block = args.get("block").and_then(Value::as_bool).unwrap_or(false);
    let timeout_ms = args
        .get("timeout_ms")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    match ctx
        .executor
        .get_output(task_id, block, Duration::from_millis(timeout_ms))
    {
        Ok(snapshot) => match serde_json::to_string(&snapshot) {
            Ok(json) => ToolOutput::ok(json),
            Err(e) => ToolOutput::error(format!("failed to encode snapshot: {e}")),
        },
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_task_stop(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let task_id = match required_str(args, "task_id") {
        Ok(s) => s,
        Err(e) => return e,
    };

    match ctx.executor.stop_task(task_id) {
        Ok(snapshot) => ToolOutput::ok(format!(
            "Task {task_id} is {}; cancellation is cooperative, the work stops only if it checks its flag",
            snapshot.status
        )),
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_team_create(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let name = match required_str(args, "name") {
        Ok(s) => s,
        Err(e) => return e,
    };

    match ctx.directory.create_team(name) {
        Ok(CreateOutcome::Created) => ToolOutput::ok(format!("Team '{name}' created")),
        Ok(CreateOutcome::AlreadyExists) => {
            ToolOutput::ok(format!("Team '{name}' already exists"))
        }
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_team_delete(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let name = match required_str(args, "name") {
        Ok(s) => s,
        Err(e) => return e,
    };

    match ctx.directory.delete_team(name) {
        Ok(()) => ToolOutput::ok(format!("Team '{name}' deleted")),
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_send_message(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let target = match required_str(args, "target") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let content = match required_str(args, "content") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let msg_type = match required_str(args, "type") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let team = args
        .get("team")
        .and_then(Value::as_str)
        .unwrap_or(ctx.config.core.default_team.as_str());

    let content = maybe_truncate(content, ctx.config.messaging.max_message_len);

    match ctx
        .directory
        .send(team, target, &content, msg_type, &ctx.config.core.identity)
    {
        Ok(()) => ToolOutput::ok(format!("Message sent to {target}@{team}")),
        Err(e) => ToolOutput::error(e.to_string()),
    }
}

fn handle_team_status(ctx: &ToolContext, args: &Value) -> ToolOutput {
    let name = args.get("name").and_then(Value::as_str);
    ToolOutput::ok(ctx.directory.get_team_status(name))
}

/// Clip `text` to `max_chars`, appending [`TRUNCATION_SUFFIX`] when cut.
fn maybe_truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str(TRUNCATION_SUFFIX);
        truncated
    }
}
