//! Docker Compose based devcontainers.
//!
//! A project whose `devcontainer.json` sets `dockerComposeFile` runs its
//! container under compose, so the container is looked up through
//! `docker compose ps` instead of devcontainer labels.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::ConfigDocument;
use crate::workspace::{find_project_config, read_document};

/// Compose file and service for a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    /// Canonical path of the compose file, inside the workspace.
    pub compose_file: PathBuf,
    /// `service` from `devcontainer.json`; the first container when unset.
    pub service: Option<String>,
}

impl ComposeProject {
    /// Detect a compose project from the workspace's `devcontainer.json`.
    ///
    /// Returns `None` when there is no project config, it cannot be read, it
    /// names no compose file, or the file is absolute, missing, or outside
    /// the workspace.
    pub fn detect(workspace: &Path) -> Option<Self> {
        let config_path = find_project_config(workspace)?;
        let document = match read_document(&config_path) {
            Ok(Some(document)) => document,
            Ok(None) => return None,
            Err(err) => {
                debug!(event = "core.compose.config_unreadable", error = %err);
                return None;
            }
        };
        let config_dir = config_path.parent()?;
        Self::from_document(&document, config_dir, workspace)
    }

    /// Resolve `dockerComposeFile` relative to `config_dir`, confined to `workspace`.
    pub fn from_document(
        document: &ConfigDocument,
        config_dir: &Path,
        workspace: &Path,
    ) -> Option<Self> {
        let declared = compose_file_entry(document)?;
        if Path::new(declared).is_absolute() {
            warn!(
                event = "core.compose.absolute_path_rejected",
                compose_file = %declared,
                "Absolute path in dockerComposeFile is not allowed"
            );
            return None;
        }

        // Canonicalizing also fails for a file that does not exist.
        let compose_file = config_dir.join(declared).canonicalize().ok()?;
        let root = workspace.canonicalize().ok()?;
        if !compose_file.starts_with(&root) {
            warn!(
                event = "core.compose.outside_workspace",
                compose_file = %compose_file.display(),
                "Compose file outside workspace is not allowed"
            );
            return None;
        }

        let service = document
            .get("service")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        debug!(
            event = "core.compose.detected",
            compose_file = %compose_file.display(),
            service = ?service,
        );
        Some(Self {
            compose_file,
            service,
        })
    }
}

/// `dockerComposeFile` as a string, or the first entry of a list.
fn compose_file_entry(document: &ConfigDocument) -> Option<&str> {
    let file = match document.get("dockerComposeFile")? {
        Value::String(file) => Some(file.as_str()),
        Value::Array(files) => files.first().and_then(Value::as_str),
        _ => None,
    };
    file.filter(|file| !file.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_with(config: &str, files: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".devcontainer");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("devcontainer.json"), config).unwrap();
        for file in files {
            std::fs::write(temp.path().join(file), "services: {}\n").unwrap();
        }
        temp
    }

    #[test]
    fn detects_compose_file_and_service() {
        let temp = workspace_with(
            r#"{"dockerComposeFile": "../compose.yml", "service": "app"}"#,
            &["compose.yml"],
        );
        let project = ComposeProject::detect(temp.path()).unwrap();
        assert_eq!(
            project.compose_file,
            temp.path().join("compose.yml").canonicalize().unwrap()
        );
        assert_eq!(project.service.as_deref(), Some("app"));
    }

    #[test]
    fn list_uses_first_entry() {
        let temp = workspace_with(
            r#"{"dockerComposeFile": ["../base.yml", "../extra.yml"]}"#,
            &["base.yml", "extra.yml"],
        );
        let project = ComposeProject::detect(temp.path()).unwrap();
        assert!(project.compose_file.ends_with("base.yml"));
        assert!(project.service.is_none());
    }

    #[test]
    fn plain_project_is_not_compose() {
        let temp = workspace_with(r#"{"image": "ubuntu"}"#, &[]);
        assert!(ComposeProject::detect(temp.path()).is_none());
        let empty = TempDir::new().unwrap();
        assert!(ComposeProject::detect(empty.path()).is_none());
    }

    #[test]
    fn missing_compose_file_is_not_compose() {
        let temp = workspace_with(r#"{"dockerComposeFile": "../compose.yml"}"#, &[]);
        assert!(ComposeProject::detect(temp.path()).is_none());
    }

    #[test]
    fn absolute_and_escaping_paths_are_rejected() {
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join("outside.yml"), "services: {}\n").unwrap();
        let workspace = outer.path().join("ws");
        std::fs::create_dir_all(workspace.join(".devcontainer")).unwrap();
        std::fs::write(
            workspace.join(".devcontainer/devcontainer.json"),
            r#"{"dockerComposeFile": "../../outside.yml"}"#,
        )
        .unwrap();
        assert!(ComposeProject::detect(&workspace).is_none());

        let absolute = outer.path().join("outside.yml").display().to_string();
        let temp = workspace_with(
            &serde_json::json!({"dockerComposeFile": absolute}).to_string(),
            &[],
        );
        assert!(ComposeProject::detect(temp.path()).is_none());
    }
}
