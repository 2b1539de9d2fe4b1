//! Schema for `settings.toml`.
//!
//! Every field is optional; a missing file or an empty file yields
//! [`Settings::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::merge::MergePolicy;
use crate::overrides::MountDefaults;

use super::paths::{default_common_config_path, expand_home};

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the shared common config. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_config: Option<String>,

    /// Project `forwardPorts` into `appPort` without passing the flag.
    #[serde(default)]
    pub auto_forward_ports: bool,

    #[serde(default = "default_devcontainer_bin")]
    pub devcontainer_bin: String,

    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// Defaults for `--mount HOST:CONTAINER`.
    #[serde(default)]
    pub mounts: MountDefaults,

    #[serde(default)]
    pub merge: MergeSettings,
}

/// `[merge]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Dotted key paths concatenated in addition to the built-in ones.
    #[serde(default)]
    pub concat_keys: Vec<String>,
}

fn default_devcontainer_bin() -> String {
    "devcontainer".to_string()
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            common_config: None,
            auto_forward_ports: false,
            devcontainer_bin: default_devcontainer_bin(),
            docker_bin: default_docker_bin(),
            mounts: MountDefaults::default(),
            merge: MergeSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.devcontainer_bin.trim().is_empty() {
            anyhow::bail!("devcontainer_bin must not be empty");
        }
        if self.docker_bin.trim().is_empty() {
            anyhow::bail!("docker_bin must not be empty");
        }
        if self.mounts.mount_type.trim().is_empty() {
            anyhow::bail!("mounts.type must not be empty");
        }
        for key in &self.merge.concat_keys {
            if key.split('.').any(str::is_empty) {
                anyhow::bail!("Invalid concat key '{}': empty path segment", key);
            }
        }
        Ok(())
    }

    /// Built-in concatenation paths plus `merge.concat_keys`.
    pub fn to_merge_policy(&self) -> MergePolicy {
        self.merge
            .concat_keys
            .iter()
            .fold(MergePolicy::default(), |policy, key| {
                policy.with_concat_key(key.as_str())
            })
    }

    pub fn mount_defaults(&self) -> MountDefaults {
        self.mounts.clone()
    }

    /// Configured common-config path, or the default under `home`.
    pub fn common_config_path(&self, home: &Path) -> PathBuf {
        match self.common_config.as_deref() {
            Some(raw) => expand_home(raw, home),
            None => default_common_config_path(home),
        }
    }
}
