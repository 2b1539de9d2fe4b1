//! Command-line overrides (`--mount`, `--env`, `--port`) and the document
//! fragment built from them.
//!
//! The fragment is an ordinary document merged last by the standard engine,
//! so overrides follow the same concatenation and replacement rules as every
//! other layer.

mod env;
mod mount;
mod port;

use serde_json::{Map, Value};

use crate::document::ConfigDocument;
use crate::errors::ConfigError;
use crate::merge::concat_unique;

pub use env::EnvSpec;
pub use mount::{MountDefaults, MountSpec, normalize_mount};
pub use port::PortSpec;

/// Parse one `KEY=VALUE` token.
pub fn parse_env(token: &str) -> Result<(String, String), ConfigError> {
    let spec = EnvSpec::parse(token)?;
    Ok((spec.key, spec.value))
}

/// Parse and normalize one `--port` token.
pub fn normalize_port(token: &str) -> Result<Value, ConfigError> {
    Ok(PortSpec::parse(token)?.to_value())
}

/// Raw override tokens in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    pub mounts: Vec<String>,
    pub envs: Vec<String>,
    pub ports: Vec<String>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mount(mut self, token: impl Into<String>) -> Self {
        self.mounts.push(token.into());
        self
    }

    pub fn with_mounts<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mounts.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, token: impl Into<String>) -> Self {
        self.envs.push(token.into());
        self
    }

    pub fn with_envs<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.envs.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn with_port(mut self, token: impl Into<String>) -> Self {
        self.ports.push(token.into());
        self
    }

    pub fn with_ports<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ports.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty() && self.envs.is_empty() && self.ports.is_empty()
    }

    /// Build `{mounts?, remoteEnv?, forwardPorts?}`. Empty parts are omitted.
    ///
    /// Fails on the first malformed token; nothing is partially applied.
    pub fn to_fragment(&self, defaults: &MountDefaults) -> Result<ConfigDocument, ConfigError> {
        let mut fragment = Map::new();

        let mounts = self
            .mounts
            .iter()
            .map(|token| normalize_mount(token, defaults))
            .collect::<Result<Vec<_>, _>>()?;
        if !mounts.is_empty() {
            fragment.insert(
                "mounts".to_string(),
                Value::Array(concat_unique(&mounts, &[])),
            );
        }

        let mut remote_env = Map::new();
        for token in &self.envs {
            let spec = EnvSpec::parse(token)?;
            remote_env.insert(spec.key, Value::String(spec.value));
        }
        if !remote_env.is_empty() {
            fragment.insert("remoteEnv".to_string(), Value::Object(remote_env));
        }

        let ports = self
            .ports
            .iter()
            .map(|token| normalize_port(token))
            .collect::<Result<Vec<_>, _>>()?;
        if !ports.is_empty() {
            fragment.insert(
                "forwardPorts".to_string(),
                Value::Array(concat_unique(&ports, &[])),
            );
        }

        Ok(fragment)
    }
}
