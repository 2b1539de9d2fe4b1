//! Builds the final devcontainer configuration from its layers.
//!
//! Layers are applied in a fixed order: common, then project, then the
//! optional `forwardPorts` to `appPort` projection, then the command-line
//! override fragment. Everything here is pure; reading files and running
//! containers happen in the callers.

use serde_json::Value;
use tracing::{debug, warn};

use crate::document::{ConfigDocument, parse_named};
use crate::errors::ConfigError;
use crate::merge::MergePolicy;
use crate::overrides::{MountDefaults, OverrideSet};
use crate::types::MergeSource;

/// Raw text of one configuration layer and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub origin: MergeSource,
    /// Identity reported in parse errors, usually the file path.
    pub name: String,
    pub text: String,
}

impl SourceText {
    pub fn new(origin: MergeSource, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin,
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn parse(&self) -> Result<ConfigDocument, ConfigError> {
        let document = parse_named(&self.text, self.name.as_str())?;
        debug!(
            event = "core.config.parsed",
            source = %self.origin,
            origin = %self.name,
            keys = document.len(),
        );
        Ok(document)
    }
}

/// Merge pipeline with explicit policy and mount defaults.
#[derive(Debug, Clone, Default)]
pub struct MergeOrchestrator {
    policy: MergePolicy,
    mount_defaults: MountDefaults,
}

impl MergeOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mount_defaults(mut self, defaults: MountDefaults) -> Self {
        self.mount_defaults = defaults;
        self
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn mount_defaults(&self) -> &MountDefaults {
        &self.mount_defaults
    }

    /// Merge common, project and overrides into one document.
    ///
    /// Override tokens are validated before any merging, so a bad token
    /// never yields a partially built result.
    pub fn build_final_config(
        &self,
        common: Option<&ConfigDocument>,
        project: Option<&ConfigDocument>,
        overrides: &OverrideSet,
        auto_forward_ports: bool,
    ) -> Result<ConfigDocument, ConfigError> {
        let fragment = overrides.to_fragment(&self.mount_defaults)?;

        let mut result = common.cloned().unwrap_or_default();
        debug!(
            event = "core.merge.layer",
            source = %MergeSource::Common,
            present = common.is_some(),
        );

        if let Some(project) = project {
            result = self.policy.merge(&result, project);
        }
        debug!(
            event = "core.merge.layer",
            source = %MergeSource::Project,
            present = project.is_some(),
        );

        if auto_forward_ports {
            result = self.project_forward_ports(result);
        }

        if !fragment.is_empty() {
            result = self.policy.merge(&result, &fragment);
        }
        debug!(
            event = "core.merge.layer",
            source = %MergeSource::Override,
            keys = fragment.len(),
        );

        Ok(result)
    }

    /// Parse the given layers and build the final document.
    ///
    /// A present but unparseable layer aborts the build with its name attached.
    pub fn build_from_sources(
        &self,
        common: Option<&SourceText>,
        project: Option<&SourceText>,
        overrides: &OverrideSet,
        auto_forward_ports: bool,
    ) -> Result<ConfigDocument, ConfigError> {
        let common = common.map(SourceText::parse).transpose()?;
        let project = project.map(SourceText::parse).transpose()?;
        self.build_final_config(
            common.as_ref(),
            project.as_ref(),
            overrides,
            auto_forward_ports,
        )
    }

    /// Copy a non-empty `forwardPorts` list into `appPort`.
    fn project_forward_ports(&self, mut result: ConfigDocument) -> ConfigDocument {
        let ports = match result.get("forwardPorts") {
            Some(Value::Array(ports)) if !ports.is_empty() => ports.clone(),
            _ => return result,
        };

        if let Some(existing) = result.get("appPort") {
            warn!(
                event = "core.merge.app_port_replaced",
                previous = %existing,
                "appPort replaced by forwardPorts projection"
            );
        }
        debug!(
            event = "core.merge.projection",
            ports = ports.len(),
        );

        // Replaces in place whatever the concat policy says about `appPort`.
        result.insert("appPort".to_string(), Value::Array(ports));
        result
    }
}

/// [`MergeOrchestrator::build_final_config`] with default policy and mount defaults.
pub fn build_final_config(
    common: Option<&ConfigDocument>,
    project: Option<&ConfigDocument>,
    overrides: &OverrideSet,
    auto_forward_ports: bool,
) -> Result<ConfigDocument, ConfigError> {
    MergeOrchestrator::new().build_final_config(common, project, overrides, auto_forward_ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::into_document;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        into_document(value)
    }

    #[test]
    fn project_only_without_overrides_is_unchanged() {
        let project = doc(json!({"name": "x"}));
        let result = build_final_config(None, Some(&project), &OverrideSet::new(), false).unwrap();
        assert_eq!(result, project);
    }

    #[test]
    fn nothing_at_all_is_empty() {
        let result = build_final_config(None, None, &OverrideSet::new(), true).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn precedence_is_common_project_override() {
        let common = doc(json!({"name": "common", "remoteUser": "vscode"}));
        let project = doc(json!({"name": "project"}));
        let overrides = OverrideSet::new().with_env("A=1");
        let result =
            build_final_config(Some(&common), Some(&project), &overrides, false).unwrap();
        assert_eq!(result["name"], json!("project"));
        assert_eq!(result["remoteUser"], json!("vscode"));
        assert_eq!(result["remoteEnv"], json!({"A": "1"}));
    }

    #[test]
    fn override_env_beats_project_env() {
        let project = doc(json!({"remoteEnv": {"A": "project", "B": "kept"}}));
        let overrides = OverrideSet::new().with_env("A=cli");
        let result = build_final_config(None, Some(&project), &overrides, false).unwrap();
        assert_eq!(result["remoteEnv"], json!({"A": "cli", "B": "kept"}));
    }

    #[test]
    fn projection_copies_forward_ports() {
        let project = doc(json!({"forwardPorts": [8000, 3000]}));
        let result = build_final_config(None, Some(&project), &OverrideSet::new(), true).unwrap();
        assert_eq!(result["forwardPorts"], json!([8000, 3000]));
        assert_eq!(result["appPort"], json!([8000, 3000]));
    }

    #[test]
    fn no_projection_without_flag() {
        let project = doc(json!({"forwardPorts": [8000, 3000]}));
        let result = build_final_config(None, Some(&project), &OverrideSet::new(), false).unwrap();
        assert!(result.get("appPort").is_none());
        assert_eq!(result["forwardPorts"], json!([8000, 3000]));
    }

    #[test]
    fn projection_replaces_existing_app_port() {
        let project = doc(json!({"appPort": 9999, "forwardPorts": [3000]}));
        let result = build_final_config(None, Some(&project), &OverrideSet::new(), true).unwrap();
        assert_eq!(result["appPort"], json!([3000]));
    }

    #[test]
    fn projection_replaces_even_when_app_port_concatenates() {
        let orchestrator = MergeOrchestrator::new()
            .with_policy(MergePolicy::default().with_concat_key("appPort"));
        let project = doc(json!({"appPort": [9999], "name": "x", "forwardPorts": [3000]}));
        let result = orchestrator
            .build_final_config(None, Some(&project), &OverrideSet::new(), true)
            .unwrap();
        assert_eq!(result["appPort"], json!([3000]));
        let keys: Vec<_> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["appPort", "name", "forwardPorts"]);
    }

    #[test]
    fn projection_skips_empty_or_non_list_ports() {
        for value in [json!({"forwardPorts": []}), json!({"forwardPorts": 3000})] {
            let project = doc(value);
            let result =
                build_final_config(None, Some(&project), &OverrideSet::new(), true).unwrap();
            assert!(result.get("appPort").is_none());
        }
    }

    #[test]
    fn projection_ignores_cli_ports() {
        let project = doc(json!({"forwardPorts": [3000]}));
        let overrides = OverrideSet::new().with_port("5000");
        let result = build_final_config(None, Some(&project), &overrides, true).unwrap();
        assert_eq!(result["appPort"], json!([3000]));
        assert_eq!(result["forwardPorts"], json!([3000, 5000]));
    }

    #[test]
    fn override_mounts_append_to_common_and_project() {
        let common = doc(json!({"mounts": ["source=/c,target=/c,type=bind"]}));
        let project = doc(json!({"mounts": ["source=/p,target=/p,type=bind"]}));
        let overrides = OverrideSet::new().with_mount("/o:/o");
        let result =
            build_final_config(Some(&common), Some(&project), &overrides, false).unwrap();
        let mounts = result["mounts"].as_array().unwrap();
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[2]["source"], json!("/o"));
    }

    #[test]
    fn bad_override_token_fails_the_build() {
        let overrides = OverrideSet::new().with_mount("/onlyhost");
        let err = build_final_config(None, None, &overrides, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMountSpec { .. }));
    }

    #[test]
    fn custom_mount_defaults_apply() {
        let orchestrator = MergeOrchestrator::new().with_mount_defaults(MountDefaults {
            mount_type: "volume".to_string(),
            consistency: "consistent".to_string(),
        });
        let overrides = OverrideSet::new().with_mount("cache:/cache");
        let result = orchestrator
            .build_final_config(None, None, &overrides, false)
            .unwrap();
        assert_eq!(result["mounts"][0]["type"], json!("volume"));
    }

    #[test]
    fn build_from_sources_parses_comments() {
        let common = SourceText::new(
            MergeSource::Common,
            "common.json",
            "{ // shared\n \"mounts\": [\"a\"], }",
        );
        let project = SourceText::new(
            MergeSource::Project,
            ".devcontainer/devcontainer.json",
            "{ /* app */ \"name\": \"app\", \"mounts\": [\"b\"] }",
        );
        let result = MergeOrchestrator::new()
            .build_from_sources(Some(&common), Some(&project), &OverrideSet::new(), false)
            .unwrap();
        assert_eq!(Value::Object(result), json!({"mounts": ["a", "b"], "name": "app"}));
    }

    #[test]
    fn build_from_sources_reports_origin() {
        let project = SourceText::new(MergeSource::Project, "broken.json", "{\"name\": }");
        let err = MergeOrchestrator::new()
            .build_from_sources(None, Some(&project), &OverrideSet::new(), false)
            .unwrap_err();
        match err {
            ConfigError::Parse(parse) => assert_eq!(parse.origin.as_deref(), Some("broken.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
