//! Parsing `docker inspect` output.

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The parts of `docker inspect` shown by `dev status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: InspectConfig,
    #[serde(default)]
    pub state: InspectState,
    #[serde(default)]
    pub mounts: Vec<InspectMount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectConfig {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectState {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectMount {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

impl InspectMount {
    /// `source → destination`, with `Unknown` for missing sides.
    pub fn describe(&self) -> String {
        format!(
            "{} → {}",
            self.source.as_deref().unwrap_or("Unknown"),
            self.destination.as_deref().unwrap_or("Unknown")
        )
    }
}

/// First entry of the JSON array printed by `docker inspect`.
pub fn parse_inspect_output(stdout: &str) -> anyhow::Result<Option<ContainerInfo>> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    let entries: Vec<ContainerInfo> =
        serde_json::from_str(stdout).context("Failed to parse docker inspect output")?;
    Ok(entries.into_iter().next())
}
