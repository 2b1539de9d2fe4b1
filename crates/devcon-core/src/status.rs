//! Workspace and container status for `dev status`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::container::{ContainerCli, ContainerInfo};
use crate::workspace::{find_project_config, read_document, resolve_workspace_folder};

/// Mounts listed individually before summarizing the rest.
pub const MOUNTS_SHOWN: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceStatus {
    pub workspace: PathBuf,
    /// Project config relative to the workspace, when found.
    pub config: Option<PathBuf>,
    pub workspace_folder: Option<String>,
    /// Why `workspace_folder` could not be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folder_error: Option<String>,
    pub container: Option<ContainerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub image: String,
    pub state: Option<String>,
    pub mounts: Vec<String>,
    /// Mounts beyond [`MOUNTS_SHOWN`].
    pub more_mounts: usize,
}

impl ContainerSummary {
    pub fn from_info(id: &str, info: Option<&ContainerInfo>) -> Self {
        let short_id: String = id.chars().take(12).collect();
        match info {
            Some(info) => Self {
                id: short_id,
                image: info
                    .config
                    .image
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                state: info.state.status.clone(),
                mounts: info
                    .mounts
                    .iter()
                    .take(MOUNTS_SHOWN)
                    .map(|mount| mount.describe())
                    .collect(),
                more_mounts: info.mounts.len().saturating_sub(MOUNTS_SHOWN),
            },
            None => Self {
                id: short_id,
                image: "Unknown".to_string(),
                state: None,
                mounts: Vec::new(),
                more_mounts: 0,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.as_deref().is_none_or(|state| state == "running")
    }
}

impl WorkspaceStatus {
    /// Collect config and container state. A stopped container, or docker
    /// being unavailable, is `container: None`.
    pub fn collect(workspace: &Path, cli: &ContainerCli) -> Self {
        let config_path = find_project_config(workspace);

        let resolved = match config_path.as_deref() {
            Some(path) => {
                read_document(path).and_then(|doc| resolve_workspace_folder(doc.as_ref()))
            }
            None => resolve_workspace_folder(None),
        };
        let (workspace_folder, workspace_folder_error) = match resolved {
            Ok(folder) => (Some(folder), None),
            Err(err) => (None, Some(err.to_string())),
        };

        let container = match cli.find_container_id(workspace) {
            Ok(Some(id)) => {
                let info = cli.inspect(&id).unwrap_or_else(|err| {
                    warn!(event = "core.status.inspect_failed", id = %id, error = %err);
                    None
                });
                Some(ContainerSummary::from_info(&id, info.as_ref()))
            }
            Ok(None) => None,
            Err(err) => {
                warn!(
                    event = "core.status.lookup_failed",
                    workspace = %workspace.display(),
                    error = %err,
                );
                None
            }
        };

        Self {
            workspace: workspace.to_path_buf(),
            config: config_path.map(|path| {
                path.strip_prefix(workspace)
                    .map(Path::to_path_buf)
                    .unwrap_or(path)
            }),
            workspace_folder,
            workspace_folder_error,
            container,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{InspectConfig, InspectMount, InspectState};

    fn mount(source: &str, destination: &str) -> InspectMount {
        InspectMount {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
        }
    }

    #[test]
    fn summary_truncates_mounts() {
        let info = ContainerInfo {
            id: "abcdef0123456789".to_string(),
            config: InspectConfig {
                image: Some("mcr.microsoft.com/devcontainers/base".to_string()),
            },
            state: InspectState {
                status: Some("running".to_string()),
            },
            mounts: vec![
                mount("/a", "/a"),
                mount("/b", "/b"),
                mount("/c", "/c"),
                mount("/d", "/d"),
                mount("/e", "/e"),
            ],
            ..ContainerInfo::default()
        };
        let summary = ContainerSummary::from_info("abcdef0123456789", Some(&info));
        assert_eq!(summary.id, "abcdef012345");
        assert_eq!(summary.image, "mcr.microsoft.com/devcontainers/base");
        assert_eq!(summary.mounts.len(), 3);
        assert_eq!(summary.more_mounts, 2);
        assert!(summary.is_running());
    }

    #[test]
    fn summary_without_inspect_data() {
        let summary = ContainerSummary::from_info("abc", None);
        assert_eq!(summary.id, "abc");
        assert_eq!(summary.image, "Unknown");
        assert!(summary.mounts.is_empty());
    }
}
