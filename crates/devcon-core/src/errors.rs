//! Error types for the merge engine and its inputs.

use std::path::PathBuf;

pub use crate::document::ParseError;

/// Errors raised while building the final configuration.
///
/// Merge type mismatches are not represented here: the overlay always wins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid mount '{token}' (expected HOST:CONTAINER or source=...,target=...)")]
    InvalidMountSpec { token: String },

    #[error("Invalid env '{token}' (expected KEY=VALUE)")]
    InvalidEnvSpec { token: String },

    #[error("Invalid port '{token}' (expected PORT or HOST:PORT)")]
    InvalidPortSpec { token: String },

    #[error("Invalid workspaceFolder '{value}': {reason}")]
    InvalidWorkspaceFolder { value: String, reason: String },

    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigError {
    /// The literal command-line token that was rejected, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidMountSpec { token }
            | ConfigError::InvalidEnvSpec { token }
            | ConfigError::InvalidPortSpec { token } => Some(token),
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
