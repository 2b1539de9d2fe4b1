//! `--env KEY=VALUE` tokens.

use crate::errors::ConfigError;

/// One remote environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSpec {
    pub key: String,
    pub value: String,
}

impl EnvSpec {
    /// Split at the first `=`; the value may itself contain `=` or be empty.
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidEnvSpec {
                token: token.to_string(),
            })?;
        if key.is_empty() {
            return Err(ConfigError::InvalidEnvSpec {
                token: token.to_string(),
            });
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_value() {
        let spec = EnvSpec::parse("NODE_ENV=development").unwrap();
        assert_eq!(spec.key, "NODE_ENV");
        assert_eq!(spec.value, "development");
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let spec = EnvSpec::parse("OPTS=--a=1 --b=2").unwrap();
        assert_eq!(spec.value, "--a=1 --b=2");
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(EnvSpec::parse("EMPTY=").unwrap().value, "");
    }

    #[test]
    fn missing_equals_is_rejected() {
        let err = EnvSpec::parse("NODE_ENV").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvSpec { ref token } if token == "NODE_ENV"));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(EnvSpec::parse("=value").is_err());
    }
}
