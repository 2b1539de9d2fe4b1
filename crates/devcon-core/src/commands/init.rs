//! Init command implementation.
//!
//! Writes the common config template. Overwriting needs `force`; asking the
//! user is left to the frontend.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::document::to_pretty_json;
use crate::template::common_config_template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    /// The file exists and `force` was not set; nothing was written.
    AlreadyExists(PathBuf),
}

pub fn init_common_config(path: &Path, force: bool) -> anyhow::Result<InitOutcome> {
    if path.exists() && !force {
        return Ok(InitOutcome::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut content = to_pretty_json(&common_config_template());
    content.push('\n');
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write common config: {}", path.display()))?;
    info!(event = "core.init.written", path = %path.display());
    Ok(InitOutcome::Created(path.to_path_buf()))
}
