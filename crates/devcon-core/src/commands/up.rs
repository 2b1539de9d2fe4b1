//! Up command implementation.
//!
//! Discovers the project and common configs, merges them with the
//! command-line overrides, writes the result to a temporary override file
//! and starts the container with `devcontainer up`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::container::UpRequest;
use crate::context::AppContext;
use crate::document::{ConfigDocument, to_pretty_json};
use crate::overrides::OverrideSet;
use crate::types::MergeSource;
use crate::workspace::{find_project_config, read_source};

/// Options for the up command
#[derive(Debug, Clone)]
pub struct UpOptions {
    /// Workspace folder on the host
    pub workspace: PathBuf,
    /// Common config path; the configured default when unset
    pub common_config: Option<PathBuf>,
    /// `--mount`, `--env` and `--port` tokens
    pub overrides: OverrideSet,
    /// Copy `forwardPorts` into `appPort`
    pub auto_forward_ports: bool,
    /// Remove the existing container first
    pub clean: bool,
    /// Build the image without cache
    pub no_cache: bool,
    /// Request all GPUs
    pub gpu: bool,
    /// Merge and report only
    pub dry_run: bool,
}

impl UpOptions {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            common_config: None,
            overrides: OverrideSet::default(),
            auto_forward_ports: false,
            clean: false,
            no_cache: false,
            gpu: false,
            dry_run: false,
        }
    }

    pub fn with_common_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.common_config = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: OverrideSet) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_auto_forward_ports(mut self, enabled: bool) -> Self {
        self.auto_forward_ports = enabled;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// `--rebuild` is `--clean` plus `--no-cache`.
    pub fn with_rebuild(self, rebuild: bool) -> Self {
        if rebuild {
            self.with_clean(true).with_no_cache(true)
        } else {
            self
        }
    }

    pub fn with_gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Inputs and result of a merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergePlan {
    pub workspace: PathBuf,
    pub project_config: PathBuf,
    pub common_config: PathBuf,
    pub common_config_found: bool,
    pub mounts: Vec<String>,
    pub envs: Vec<String>,
    pub ports: Vec<String>,
    pub auto_forward_ports: bool,
    pub config: ConfigDocument,
}

/// Report from an up operation
#[derive(Debug, Clone)]
pub struct UpReport {
    pub plan: MergePlan,
    /// Exit code of `devcontainer up`; `None` for a dry run.
    pub exit_code: Option<i32>,
}

impl UpReport {
    pub fn success(&self) -> bool {
        self.exit_code.is_none_or(|code| code == 0)
    }
}

/// Up command orchestrator
#[derive(Debug)]
pub struct UpCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> UpCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Discover, read and merge without touching docker.
    pub fn plan(&self, options: &UpOptions) -> anyhow::Result<MergePlan> {
        let workspace = options.workspace.as_path();
        let project_path = find_project_config(workspace).ok_or_else(|| {
            anyhow::anyhow!(
                "No devcontainer.json found in {} (looked in .devcontainer/devcontainer.json and devcontainer.json)",
                workspace.display()
            )
        })?;
        let common_path = options
            .common_config
            .clone()
            .unwrap_or_else(|| self.ctx.common_config_path());

        let common = read_source(&common_path, MergeSource::Common)?;
        let project = read_source(&project_path, MergeSource::Project)?;
        let auto_forward_ports = options.auto_forward_ports || self.ctx.settings().auto_forward_ports;

        let config = self
            .ctx
            .orchestrator()
            .build_from_sources(
                common.as_ref(),
                project.as_ref(),
                &options.overrides,
                auto_forward_ports,
            )
            .with_context(|| format!("Failed to build configuration for {}", workspace.display()))?;

        debug!(
            event = "core.up.planned",
            workspace = %workspace.display(),
            project = %project_path.display(),
            common_found = common.is_some(),
            keys = config.len(),
        );

        Ok(MergePlan {
            workspace: workspace.to_path_buf(),
            project_config: project_path,
            common_config: common_path,
            common_config_found: common.is_some(),
            mounts: options.overrides.mounts.clone(),
            envs: options.overrides.envs.clone(),
            ports: options.overrides.ports.clone(),
            auto_forward_ports,
            config,
        })
    }

    pub fn execute(&self, options: &UpOptions) -> anyhow::Result<UpReport> {
        let plan = self.plan(options)?;
        self.launch(plan, options)
    }

    /// Start the container from an existing plan; a dry run stops here.
    pub fn launch(&self, plan: MergePlan, options: &UpOptions) -> anyhow::Result<UpReport> {
        if options.dry_run {
            return Ok(UpReport {
                plan,
                exit_code: None,
            });
        }

        let override_file = write_override_file(&plan.config)?;
        let request = UpRequest::new(&plan.workspace, override_file.path())
            .with_remove_existing_container(options.clean)
            .with_build_no_cache(options.no_cache)
            .with_gpu(options.gpu);

        info!(
            event = "core.up.started",
            workspace = %plan.workspace.display(),
            override_config = %override_file.path().display(),
        );
        let exit_code = self.ctx.container_cli().up(&request)?;
        // The override file is removed when dropped, after devcontainer exits.
        drop(override_file);

        Ok(UpReport {
            plan,
            exit_code: Some(exit_code),
        })
    }
}

/// Write the merged document to a temporary `.json` file.
pub fn write_override_file(config: &ConfigDocument) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("devcontainer-override-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create temporary override config")?;
    let path = file.path().to_path_buf();
    file.write_all(to_pretty_json(config).as_bytes())
        .and_then(|()| file.flush())
        .with_context(|| {
            format!(
                "Failed to write temporary override config: {}",
                path.display()
            )
        })?;
    debug!(event = "core.up.override_written", path = %path.display());
    Ok(file)
}
