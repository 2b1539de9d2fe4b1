//! Shared core types used across the document, merge and command layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a configuration layer came from.
///
/// The variant decides precedence only; it never appears in the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeSource {
    /// Team-wide shared configuration (devcontainer.common.json).
    Common,
    /// Per-project configuration (.devcontainer/devcontainer.json).
    Project,
    /// Fragment built from command-line flags.
    Override,
}

impl MergeSource {
    /// Precedence rank; higher ranks are merged later and win.
    pub fn rank(self) -> u8 {
        match self {
            MergeSource::Common => 0,
            MergeSource::Project => 1,
            MergeSource::Override => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MergeSource::Common => "common",
            MergeSource::Project => "project",
            MergeSource::Override => "override",
        }
    }
}

impl fmt::Display for MergeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
