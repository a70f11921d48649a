//! Shared state behind every tool call.

use crate::runner::WorkRunner;
use std::sync::Arc;
use taskmate_core::config::Config;
use taskmate_core::{BackgroundExecutor, TeamDirectory};

/// Everything a tool handler needs, owned and passed by the calling loop.
///
/// One context per agent loop: constructing it is the loop's explicit
/// setup step and dropping it the teardown, so tests run against a fresh
/// executor and directory with no cross-test state.
pub struct ToolContext {
    pub executor: BackgroundExecutor,
    pub directory: TeamDirectory,
    pub runner: Arc<dyn WorkRunner>,
    pub config: Config,
}

impl ToolContext {
    pub fn new(
        executor: BackgroundExecutor,
        directory: TeamDirectory,
        runner: Arc<dyn WorkRunner>,
        config: Config,
    ) -> Self {
        Self {
            executor,
            directory,
            runner,
            config,
        }
    }
}
