//! Application context shared by the commands.

use std::path::{Path, PathBuf};

use crate::container::ContainerCli;
use crate::orchestrator::MergeOrchestrator;
use crate::settings::{Settings, SettingsStore};

/// Paths and settings resolved once per invocation.
///
/// The CLI builds this once and passes it to every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    settings_path: PathBuf,
    settings: Settings,
}

impl AppContext {
    /// Create a context with explicit paths and settings.
    pub fn new(home_dir: PathBuf, settings_path: PathBuf, settings: Settings) -> Self {
        Self {
            home_dir,
            settings_path,
            settings,
        }
    }

    /// Context from the user's home directory and the default settings file.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let store = SettingsStore::from_default_location()?;
        let settings = store.load()?;
        Ok(Self::new(home_dir, store.path().to_path_buf(), settings))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Common config path from settings, or the default under the home dir.
    pub fn common_config_path(&self) -> PathBuf {
        self.settings.common_config_path(&self.home_dir)
    }

    /// Orchestrator using the configured merge policy and mount defaults.
    pub fn orchestrator(&self) -> MergeOrchestrator {
        MergeOrchestrator::new()
            .with_policy(self.settings.to_merge_policy())
            .with_mount_defaults(self.settings.mount_defaults())
    }

    pub fn container_cli(&self) -> ContainerCli {
        ContainerCli::from_settings(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_config_defaults_under_home() {
        let ctx = AppContext::new(
            PathBuf::from("/home/dev"),
            PathBuf::from("/home/dev/.config/devcon/settings.toml"),
            Settings::default(),
        );
        assert_eq!(
            ctx.common_config_path(),
            PathBuf::from("/home/dev/.config/devcontainer.common.json")
        );
        assert_eq!(ctx.container_cli().devcontainer_bin(), "devcontainer");
    }

    #[test]
    fn orchestrator_uses_settings() {
        let mut settings = Settings::default();
        settings.merge.concat_keys.push("runArgs".to_string());
        settings.mounts.consistency = "delegated".to_string();
        let ctx = AppContext::new(PathBuf::from("/h"), PathBuf::from("/h/s.toml"), settings);

        let orchestrator = ctx.orchestrator();
        assert!(orchestrator.policy().is_concat_path(&["runArgs"]));
        assert_eq!(orchestrator.mount_defaults().consistency, "delegated");
    }
}
