//! The seam between tool calls and the actual body of a background task.
//!
//! `Task` tool calls arrive as JSON; something has to turn a command
//! string into runnable work. That is the hosting loop's job (a nested
//! agent run, a shell invocation), so it is a trait here, with a shell
//! implementation shipped for `bash`-kind tasks.

use anyhow::Context;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use taskmate_core::{CancellationToken, TaskKind};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executes the body of a scheduled task.
///
/// `run` is called on the task's own background thread and blocks until
/// the work is done. Implementations should poll `cancel` at convenient
/// points; one that never does keeps running after the task reports
/// stopped, per the executor's cooperative-cancellation contract.
pub trait WorkRunner: Send + Sync {
    fn run(
        &self,
        kind: TaskKind,
        command: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<String>;
}

/// Runs `bash`-kind tasks through `sh -c`.
///
/// The child is polled rather than waited on, so a cancellation request
/// kills it within one poll interval. `agent`-kind tasks need a runner
/// supplied by the hosting loop; this one rejects them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl WorkRunner for ShellRunner {
    fn run(
        &self,
        kind: TaskKind,
        command: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<String> {
        match kind {
            TaskKind::Bash => run_shell(command, cancel),
            TaskKind::Agent => {
                anyhow::bail!("no agent runner configured; ShellRunner only handles bash tasks")
            }
        }
    }
}

fn run_shell(command: &str, cancel: &CancellationToken) -> anyhow::Result<String> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn shell for: {command}"))?;

    loop {
        if cancel.is_cancelled() {
            // Kill and reap so the stop doesn't leave a zombie behind.
            let _ = child.kill();
            let _ = child.wait();
            anyhow::bail!("shell command cancelled");
        }
        match child.try_wait().context("failed to poll shell child")? {
            Some(_) => break,
            None => thread::sleep(POLL_INTERVAL),
        }
    }

    let output = child
        .wait_with_output()
        .context("failed to collect shell output")?;
    let stdout = String::from_utf8_lossy(&output.stdout)
        .trim_end()
        .to_string();

    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            anyhow::bail!("shell exited with {}", output.status);
        }
        anyhow::bail!("shell exited with {}: {stderr}", output.status);
    }
}
