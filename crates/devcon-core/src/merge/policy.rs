//! Which key paths concatenate their sequences instead of replacing them.

use std::collections::BTreeSet;

/// Dotted key paths (from the document root) whose arrays are concatenated.
pub const DEFAULT_CONCAT_KEYS: &[&str] = &[
    "mounts",
    "forwardPorts",
    "extensions",
    "customizations.vscode.extensions",
];

/// Per-field combination policy for the deep merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    concat_keys: BTreeSet<String>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CONCAT_KEYS.iter().copied())
    }
}

impl MergePolicy {
    /// Create a policy with exactly the given concatenation paths.
    pub fn new<I, S>(concat_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            concat_keys: concat_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a concatenation path such as `runArgs` or `features.x.items`.
    pub fn with_concat_key(mut self, key: impl Into<String>) -> Self {
        self.concat_keys.insert(key.into());
        self
    }

    /// Whether arrays found at `path` concatenate.
    pub fn is_concat_path(&self, path: &[&str]) -> bool {
        !path.is_empty() && self.concat_keys.contains(&path.join("."))
    }

    pub fn concat_keys(&self) -> impl Iterator<Item = &str> {
        self.concat_keys.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let policy = MergePolicy::default();
        assert!(policy.is_concat_path(&["mounts"]));
        assert!(policy.is_concat_path(&["forwardPorts"]));
        assert!(policy.is_concat_path(&["extensions"]));
        assert!(policy.is_concat_path(&["customizations", "vscode", "extensions"]));
        assert!(!policy.is_concat_path(&["appPort"]));
        assert!(!policy.is_concat_path(&["features", "x", "mounts"]));
        assert!(!policy.is_concat_path(&[]));
    }

    #[test]
    fn extra_keys_extend_the_defaults() {
        let policy = MergePolicy::default().with_concat_key("runArgs");
        assert!(policy.is_concat_path(&["runArgs"]));
        assert!(policy.is_concat_path(&["mounts"]));
        assert_eq!(policy.concat_keys().count(), DEFAULT_CONCAT_KEYS.len() + 1);
    }
}
