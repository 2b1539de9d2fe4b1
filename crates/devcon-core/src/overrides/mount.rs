//! `--mount` tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConfigError;

/// Values filled into mounts written in `host:container` shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountDefaults {
    #[serde(rename = "type", default = "default_mount_type")]
    pub mount_type: String,
    #[serde(default = "default_consistency")]
    pub consistency: String,
}

fn default_mount_type() -> String {
    "bind".to_string()
}

fn default_consistency() -> String {
    "cached".to_string()
}

impl Default for MountDefaults {
    fn default() -> Self {
        Self {
            mount_type: default_mount_type(),
            consistency: default_consistency(),
        }
    }
}

/// A mount as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum MountSpec {
    /// Already a mapping (`{"source": ..., "target": ...}`), passed through.
    Mapping(Map<String, Value>),
    /// Docker `--mount` syntax (`source=...,target=...`), passed through.
    Full(String),
    /// `host:container`.
    Shorthand { host: String, container: String },
}

impl MountSpec {
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidMountSpec {
            token: token.to_string(),
        };

        let trimmed = token.trim();
        if trimmed.starts_with('{') {
            return serde_json::from_str::<Map<String, Value>>(trimmed)
                .map(MountSpec::Mapping)
                .map_err(|_| invalid());
        }

        if token.contains("source=") && token.contains("target=") {
            return Ok(MountSpec::Full(token.to_string()));
        }

        let mut parts = token.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(container), None) if !host.is_empty() && !container.is_empty() => {
                Ok(MountSpec::Shorthand {
                    host: host.to_string(),
                    container: container.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// Canonical value for the `mounts` list.
    pub fn to_value(&self, defaults: &MountDefaults) -> Value {
        match self {
            MountSpec::Mapping(map) => Value::Object(map.clone()),
            MountSpec::Full(raw) => Value::String(raw.clone()),
            MountSpec::Shorthand { host, container } => {
                let mut map = Map::new();
                map.insert("source".to_string(), Value::String(host.clone()));
                map.insert("target".to_string(), Value::String(container.clone()));
                map.insert("type".to_string(), Value::String(defaults.mount_type.clone()));
                map.insert(
                    "consistency".to_string(),
                    Value::String(defaults.consistency.clone()),
                );
                Value::Object(map)
            }
        }
    }
}

/// Parse and normalize one `--mount` token.
pub fn normalize_mount(token: &str, defaults: &MountDefaults) -> Result<Value, ConfigError> {
    Ok(MountSpec::parse(token)?.to_value(defaults))
}
