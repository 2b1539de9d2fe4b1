//! Starter content for the shared common config.

use serde_json::json;

use crate::document::{ConfigDocument, into_document};

pub const CLAUDE_CODE_FEATURE: &str = "ghcr.io/anthropics/devcontainer-features/claude-code:latest";

pub const CLAUDE_CONFIG_MOUNT: &str = "source=${env:HOME}${env:USERPROFILE}/.claude,target=/home/vscode/.claude,type=bind,consistency=cached";

/// Template written by `dev init`.
pub fn common_config_template() -> ConfigDocument {
    into_document(json!({
        "features": {
            CLAUDE_CODE_FEATURE: {}
        },
        "mounts": [CLAUDE_CONFIG_MOUNT],
        "customizations": {
            "vscode": {
                "extensions": []
            }
        }
    }))
}
