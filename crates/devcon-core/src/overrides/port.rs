//! `--port` tokens.

use serde_json::Value;

use crate::errors::ConfigError;

/// A forwarded port as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSpec {
    /// `3000`, emitted as a JSON number.
    Port(u16),
    /// `db:5432` or `8080:80`, emitted verbatim as a string.
    Mapped {
        host: String,
        port: u16,
        token: String,
    },
}

impl PortSpec {
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidPortSpec {
            token: token.to_string(),
        };

        match token.split_once(':') {
            None => parse_port(token).map(PortSpec::Port).ok_or_else(invalid),
            Some((host, port)) if !host.is_empty() && !host.contains(':') => {
                let port = parse_port(port).ok_or_else(invalid)?;
                Ok(PortSpec::Mapped {
                    host: host.to_string(),
                    port,
                    token: token.to_string(),
                })
            }
            Some(_) => Err(invalid()),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            PortSpec::Port(port) => Value::from(*port),
            PortSpec::Mapped { token, .. } => Value::String(token.clone()),
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u16>().ok().filter(|port| *port != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_port_is_a_number() {
        assert_eq!(PortSpec::parse("3000").unwrap().to_value(), json!(3000));
    }

    #[test]
    fn mapped_port_is_a_string() {
        assert_eq!(PortSpec::parse("8080:80").unwrap().to_value(), json!("8080:80"));
        assert_eq!(PortSpec::parse("db:5432").unwrap().to_value(), json!("db:5432"));
    }

    #[test]
    fn mapped_port_keeps_token_text() {
        let spec = PortSpec::parse("8080:0080").unwrap();
        assert!(matches!(spec, PortSpec::Mapped { port: 80, .. }));
        assert_eq!(spec.to_value(), json!("8080:0080"));
    }

    #[test]
    fn invalid_ports_are_rejected() {
        for token in ["", "abc", "0", "65536", "+80", ":80", "db:", "a:b:c", "8080:http"] {
            let err = PortSpec::parse(token).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidPortSpec { .. }),
                "expected {token:?} to be rejected"
            );
        }
    }
}
