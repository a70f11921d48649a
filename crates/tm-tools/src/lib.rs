//! Tool-call contracts over the taskmate core
//!
//! An external agent loop consumes the core exclusively through the tool
//! surface declared here: spawn a background task, poll or stop it, manage
//! teams, and send teammate messages. The loop owns a [`ToolContext`] and
//! routes every model tool call through [`dispatch`]; inbox checking is
//! not a declared tool because each teammate's own loop iteration performs
//! it directly.

pub mod context;
pub mod defs;
pub mod dispatch;
pub mod runner;

pub use context::ToolContext;
pub use defs::{teammate_tool_definitions, tool_definitions};
pub use dispatch::{ToolOutput, dispatch};
pub use runner::{ShellRunner, WorkRunner};
