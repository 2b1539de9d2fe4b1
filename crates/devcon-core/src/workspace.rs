//! Locating and reading configuration files for a workspace.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::document::{ConfigDocument, parse_named};
use crate::errors::ConfigError;
use crate::orchestrator::SourceText;
use crate::types::MergeSource;

/// Container path used when the project does not set `workspaceFolder`.
pub const DEFAULT_WORKSPACE_FOLDER: &str = "/workspace";

/// Candidate project config locations, in lookup order.
pub fn project_config_candidates(workspace: &Path) -> [PathBuf; 2] {
    [
        workspace.join(".devcontainer").join("devcontainer.json"),
        workspace.join("devcontainer.json"),
    ]
}

/// First existing project config in the workspace.
pub fn find_project_config(workspace: &Path) -> Option<PathBuf> {
    let found = project_config_candidates(workspace)
        .into_iter()
        .find(|candidate| candidate.is_file());
    debug!(
        event = "core.workspace.discovery",
        workspace = %workspace.display(),
        found = ?found,
    );
    found
}

/// Read a file as a layer. A missing file is `None`.
pub fn read_source(path: &Path, origin: MergeSource) -> Result<Option<SourceText>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(SourceText::new(
            origin,
            path.display().to_string(),
            text,
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(
                event = "core.workspace.missing",
                source = %origin,
                path = %path.display(),
            );
            Ok(None)
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and parse a document. A missing file is `None`.
pub fn read_document(path: &Path) -> Result<Option<ConfigDocument>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_named(&text, path.display().to_string())?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `workspaceFolder` from a project document, validated and normalized.
pub fn resolve_workspace_folder(project: Option<&ConfigDocument>) -> Result<String, ConfigError> {
    match project.and_then(|doc| doc.get("workspaceFolder")) {
        None => Ok(DEFAULT_WORKSPACE_FOLDER.to_string()),
        Some(Value::String(raw)) => sanitize_workspace_folder(raw),
        Some(other) => Err(ConfigError::InvalidWorkspaceFolder {
            value: other.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

/// Reject empty or control-character paths and resolve `.`/`..` lexically
/// into an absolute container path.
pub fn sanitize_workspace_folder(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidWorkspaceFolder {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    if raw.trim().is_empty() {
        return Err(invalid("path is empty"));
    }
    if raw.chars().any(char::is_control) {
        return Err(invalid("path contains control characters"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}
