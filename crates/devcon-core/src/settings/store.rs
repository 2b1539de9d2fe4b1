//! Loading and saving settings.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::{Settings, parser, paths::settings_path};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at `<config_dir>/devcon/settings.toml`.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::from_config_dir(&config_dir))
    }

    pub fn from_config_dir(config_dir: &Path) -> Self {
        Self::from_path(settings_path(config_dir))
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults.
    pub fn load(&self) -> anyhow::Result<Settings> {
        if !self.path.exists() {
            debug!(
                event = "core.settings.defaults",
                path = %self.path.display(),
            );
            return Ok(Settings::default());
        }
        let settings = parser::parse_settings(&self.path)?;
        debug!(
            event = "core.settings.loaded",
            path = %self.path.display(),
        );
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        let content = parser::to_toml(settings)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))?;
        Ok(())
    }
}
