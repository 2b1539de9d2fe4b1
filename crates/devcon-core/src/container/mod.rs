//! Invoking the `devcontainer` and `docker` CLIs.
//!
//! Argument construction is kept separate from process spawning so it can be
//! tested without either tool installed.

mod args;
mod compose;
mod inspect;

use std::path::Path;
use std::process::Command;

use anyhow::Context;
use tracing::{debug, info};

use crate::settings::Settings;

pub use args::{
    UpRequest, compose_ps_args, container_label_filters, exec_args, inspect_args, ps_args,
    up_args,
};
pub use compose::ComposeProject;
pub use inspect::{ContainerInfo, InspectConfig, InspectMount, InspectState, parse_inspect_output};

/// Runs devcontainer and docker commands with the configured binaries.
#[derive(Debug, Clone)]
pub struct ContainerCli {
    devcontainer_bin: String,
    docker_bin: String,
}

impl Default for ContainerCli {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ContainerCli {
    pub fn new(devcontainer_bin: impl Into<String>, docker_bin: impl Into<String>) -> Self {
        Self {
            devcontainer_bin: devcontainer_bin.into(),
            docker_bin: docker_bin.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.devcontainer_bin, &settings.docker_bin)
    }

    pub fn devcontainer_bin(&self) -> &str {
        &self.devcontainer_bin
    }

    pub fn docker_bin(&self) -> &str {
        &self.docker_bin
    }

    /// Run `devcontainer up` attached to the terminal; returns its exit code.
    pub fn up(&self, request: &UpRequest) -> anyhow::Result<i32> {
        self.run_interactive(&self.devcontainer_bin, &up_args(request))
    }

    /// Run a command in the workspace container; returns its exit code.
    pub fn exec(&self, workspace: &Path, command: &[String]) -> anyhow::Result<i32> {
        self.run_interactive(&self.devcontainer_bin, &exec_args(workspace, command))
    }

    /// Id of the running container for `workspace`.
    ///
    /// Compose projects are looked up with `docker compose ps`; others by
    /// trying each label filter in turn.
    pub fn find_container_id(&self, workspace: &Path) -> anyhow::Result<Option<String>> {
        if let Some(project) = ComposeProject::detect(workspace) {
            let args = compose_ps_args(&project.compose_file, project.service.as_deref());
            return self.first_container_id(&args, "compose ps");
        }

        for filter in container_label_filters(workspace) {
            if let Some(id) = self.first_container_id(&ps_args(&filter), "ps")? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// First id printed by a docker listing; `None` when it fails or lists nothing.
    fn first_container_id(&self, args: &[String], what: &str) -> anyhow::Result<Option<String>> {
        let output = Command::new(&self.docker_bin)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {} {}", self.docker_bin, what))?;

        if !output.status.success() {
            debug!(
                event = "core.container.ps_failed",
                args = %args.join(" "),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let id = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);
        if let Some(id) = &id {
            debug!(event = "core.container.found", args = %args.join(" "), id = %id);
        }
        Ok(id)
    }

    pub fn is_running(&self, workspace: &Path) -> anyhow::Result<bool> {
        Ok(self.find_container_id(workspace)?.is_some())
    }

    /// `docker inspect`; `None` when docker reports nothing usable.
    pub fn inspect(&self, container_id: &str) -> anyhow::Result<Option<ContainerInfo>> {
        let output = Command::new(&self.docker_bin)
            .args(inspect_args(container_id))
            .output()
            .with_context(|| format!("Failed to run {} inspect", self.docker_bin))?;

        if !output.status.success() {
            debug!(
                event = "core.container.inspect_failed",
                id = %container_id,
                code = ?output.status.code(),
            );
            return Ok(None);
        }

        parse_inspect_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn run_interactive(&self, program: &str, args: &[String]) -> anyhow::Result<i32> {
        info!(
            event = "core.container.run",
            program = %program,
            args = %args.join(" "),
        );
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run {} (is it installed and on PATH?)", program))?;

        // Killed by a signal: no code, report failure.
        let code = status.code().unwrap_or(1);
        debug!(event = "core.container.exited", program = %program, code);
        Ok(code)
    }
}
