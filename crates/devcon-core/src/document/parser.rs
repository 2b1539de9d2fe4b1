//! Comment-tolerant JSON parser with located error messages.

use serde_json::{Map, Value};

use super::scanner::{self, ScanError};
use super::{ConfigDocument, Location, ParseError};

/// Parse a devcontainer document.
///
/// Accepts `//` and `/* */` comments and trailing commas. Empty input (or
/// input made only of comments) yields an empty document.
pub fn parse(text: &str) -> Result<ConfigDocument, ParseError> {
    parse_document(text, None)
}

/// Parse a document and attach `origin` (usually a file path) to any error.
pub fn parse_named(text: &str, origin: impl Into<String>) -> Result<ConfigDocument, ParseError> {
    parse_document(text, Some(origin.into()))
}

fn parse_document(text: &str, origin: Option<String>) -> Result<ConfigDocument, ParseError> {
    let stripped = scanner::strip(text).map_err(|e| scan_error(e, text, origin.clone()))?;

    if scanner::is_blank(&stripped) {
        return Ok(Map::new());
    }

    let value: Value =
        serde_json::from_slice(&stripped).map_err(|e| json_error(&e, text, origin.clone()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            let location = stripped
                .iter()
                .position(|b| !b.is_ascii_whitespace())
                .map(|offset| location_at(text, offset));
            Err(ParseError {
                origin,
                message: format!(
                    "expected a JSON object at the document root, found {}",
                    kind_name(&other)
                ),
                excerpt: location.map(|loc| line_context(text, loc.line)),
                location,
            })
        }
    }
}

fn scan_error(error: ScanError, text: &str, origin: Option<String>) -> ParseError {
    let location = location_at(text, error.offset());
    let message = match error {
        ScanError::UnterminatedComment { .. } => "unterminated block comment".to_string(),
    };
    ParseError {
        origin,
        message,
        excerpt: Some(line_context(text, location.line)),
        location: Some(location),
    }
}

fn json_error(error: &serde_json::Error, text: &str, origin: Option<String>) -> ParseError {
    let full = error.to_string();
    let suffix = format!(" at line {} column {}", error.line(), error.column());
    let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();

    let location = (error.line() > 0).then(|| Location {
        line: error.line(),
        column: error.column(),
    });

    ParseError {
        origin,
        message,
        excerpt: location.map(|loc| line_context(text, loc.line)),
        location,
    }
}

/// 1-based line and column of a byte offset.
fn location_at(text: &str, offset: usize) -> Location {
    let before = &text.as_bytes()[..offset.min(text.len())];
    let line = before.iter().filter(|b| **b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    Location {
        line,
        column: offset - line_start + 1,
    }
}

/// Context lines around an error, with the failing line marked.
fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());
    if start >= end {
        return String::new();
    }

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

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
