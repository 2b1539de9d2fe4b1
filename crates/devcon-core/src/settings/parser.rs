//! TOML parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::Settings;

/// Parse settings.toml with detailed error messages
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
    settings.validate()?;
    Ok(settings)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.to_string();

    let line_num = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_num {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            error_msg
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", error_msg),
    }
}

/// Lines around `line_num`, the failing one marked `>>>`.
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_settings() {
        let toml = r#"
common_config = "~/.config/team.common.json"
auto_forward_ports = true
devcontainer_bin = "/opt/bin/devcontainer"

[mounts]
type = "volume"
consistency = "delegated"

[merge]
concat_keys = ["runArgs"]
"#;
        let settings = parse_settings_str(toml).unwrap();
        assert_eq!(
            settings.common_config.as_deref(),
            Some("~/.config/team.common.json")
        );
        assert!(settings.auto_forward_ports);
        assert_eq!(settings.devcontainer_bin, "/opt/bin/devcontainer");
        assert_eq!(settings.docker_bin, "docker");
        assert_eq!(settings.mounts.mount_type, "volume");
        assert_eq!(settings.mounts.consistency, "delegated");
        assert_eq!(settings.merge.concat_keys, vec!["runArgs".to_string()]);
    }

    #[test]
    fn test_parse_empty_settings() {
        assert_eq!(parse_settings_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_mount_table_keeps_defaults() {
        let settings = parse_settings_str("[mounts]\ntype = \"volume\"\n").unwrap();
        assert_eq!(settings.mounts.consistency, "cached");
    }

    #[test]
    fn test_invalid_toml_has_line_context() {
        let toml = "auto_forward_ports = true\ndocker_bin = [unclosed\n";
        let err = parse_settings_str(toml).unwrap_err().to_string();
        assert!(err.contains("TOML parsing error"));
        assert!(err.contains(">>>"));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = parse_settings_str("docker_bin = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("docker_bin"));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut original = Settings::default();
        original.common_config = Some("/srv/common.json".to_string());
        original.merge.concat_keys.push("runArgs".to_string());

        let parsed = parse_settings_str(&to_toml(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "auto_forward_ports = true").unwrap();

        let settings = parse_settings(temp_file.path()).unwrap();
        assert!(settings.auto_forward_ports);
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = parse_settings(Path::new("/nonexistent/devcon/settings.toml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read settings file")
        );
    }
}
