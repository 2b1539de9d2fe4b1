//! Exec command implementation.

use std::path::Path;

use tracing::warn;

use crate::context::AppContext;

/// Result of `dev exec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// No running container matched the workspace; nothing was run.
    NotRunning,
    /// Exit code of the command inside the container.
    Exited(i32),
}

#[derive(Debug)]
pub struct ExecCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> ExecCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    pub fn execute(&self, workspace: &Path, command: &[String]) -> anyhow::Result<ExecOutcome> {
        if command.is_empty() {
            anyhow::bail!("No command given");
        }
        let cli = self.ctx.container_cli();
        if !cli.is_running(workspace)? {
            warn!(
                event = "core.exec.not_running",
                workspace = %workspace.display(),
            );
            return Ok(ExecOutcome::NotRunning);
        }
        Ok(ExecOutcome::Exited(cli.exec(workspace, command)?))
    }
}
