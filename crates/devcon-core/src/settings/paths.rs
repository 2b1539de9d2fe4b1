//! Settings and common-config path resolution.

use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "devcon";

pub const SETTINGS_FILE: &str = "settings.toml";

/// `~/.config/devcontainer.common.json`, relative to `home`.
pub fn default_common_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("devcontainer.common.json")
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR).join(SETTINGS_FILE)
}

/// Expand a leading `~` or `~/` against `home`. Other paths are returned as-is.
pub fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}
