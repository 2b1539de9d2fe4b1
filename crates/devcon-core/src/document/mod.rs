//! Devcontainer documents and their comment-tolerant parser.
//!
//! A [`ConfigDocument`] is a JSON object whose values are the closed
//! [`serde_json::Value`] variant set. Key order is preserved from the source
//! text so merged output is reproducible.

mod parser;
mod scanner;

use std::fmt;

use serde_json::{Map, Value};

pub use parser::{parse, parse_named};

/// Root of a devcontainer configuration.
pub type ConfigDocument = Map<String, Value>;

/// 1-based position in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// The text could not be parsed even after comment and trailing-comma removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Identity of the source (file path), when known.
    pub origin: Option<String>,
    pub message: String,
    pub location: Option<Location>,
    /// A few source lines around the failure, the failing line marked `>>>`.
    pub excerpt: Option<String>,
}

impl ParseError {
    /// Attach a source identity unless one is already present.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        if self.origin.is_none() {
            self.origin = Some(origin.into());
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, "{}: ", origin)?;
        }
        match self.location {
            Some(loc) => write!(
                f,
                "JSON parsing error at line {}, column {}: {}",
                loc.line, loc.column, self.message
            )?,
            None => write!(f, "JSON parsing error: {}", self.message)?,
        }
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.is_empty()) {
            write!(f, "\n{}", excerpt)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Wrap a JSON value as a document, treating anything but an object as empty.
pub fn into_document(value: Value) -> ConfigDocument {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Render a document as pretty JSON for the override file.
pub fn to_pretty_json(document: &ConfigDocument) -> String {
    // Serializing a Map<String, Value> cannot fail.
    serde_json::to_string_pretty(document).unwrap_or_else(|_| "{}".to_string())
}
