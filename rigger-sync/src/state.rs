//! Artifact state and on-disk formats.
//!
//! A [`State`] is the structural view of an artifact's content; a [`Format`]
//! converts between that view and text. Structural equality of states is what
//! decides whether convergence writes.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::DumpError;

/// Structural content of one artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// The artifact does not exist.
    Absent,
    /// Ordered list of lines/items.
    List(Vec<String>),
    /// Key/value mapping.
    Map(Map<String, Value>),
    /// A single value, e.g. a version pin.
    Scalar(String),
}

impl State {
    pub fn kind(&self) -> &'static str {
        match self {
            State::Absent => "absent",
            State::List(_) => "list",
            State::Map(_) => "map",
            State::Scalar(_) => "scalar",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, State::Absent)
    }

    /// Build a list state from anything yielding string-ish items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        State::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            State::Map(map) => Some(map),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// How an artifact's text maps onto a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One item per line, written with a trailing newline.
    Lines,
    Json,
    Yaml,
    /// Single trimmed value.
    Scalar,
    /// Whole file as one opaque value, untrimmed.
    Text,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Lines => "lines",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Scalar => "scalar",
            Format::Text => "text",
        };
        f.write_str(name)
    }
}

impl Format {
    /// Parse present text. Returns a human-readable reason on failure.
    pub fn decode(self, text: &str) -> Result<State, String> {
        match self {
            Format::Lines => Ok(State::list(text.lines())),
            Format::Scalar => Ok(State::Scalar(text.trim().to_string())),
            Format::Text => Ok(State::Scalar(text.to_string())),
            Format::Json => {
                if text.trim().is_empty() {
                    return Ok(State::Map(Map::new()));
                }
                let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
                into_map(value)
            }
            Format::Yaml => {
                let blank = text
                    .lines()
                    .map(str::trim)
                    .all(|line| line.is_empty() || line.starts_with('#'));
                if blank {
                    return Ok(State::Map(Map::new()));
                }
                let value: Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
                into_map(value)
            }
        }
    }

    /// Serialise a state into the text written to disk.
    pub fn encode(self, state: &State) -> Result<String, DumpError> {
        match (self, state) {
            (Format::Lines, State::List(items)) => {
                if let Some(item) = items.iter().find(|i| i.contains(|c| c == '\n' || c == '\r')) {
                    return Err(DumpError::LineBreak(item.clone()));
                }
                if items.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("{}\n", items.join("\n")))
                }
            }
            (Format::Scalar, State::Scalar(value)) => Ok(format!("{}\n", value.trim())),
            (Format::Text, State::Scalar(value)) => Ok(value.clone()),
            (Format::Json, State::Map(map)) => serde_json::to_string_pretty(map)
                .map(|s| s + "\n")
                .map_err(|e| DumpError::Encode(e.to_string())),
            (Format::Yaml, State::Map(map)) => {
                if map.is_empty() {
                    return Ok(String::new());
                }
                serde_yaml::to_string(map).map_err(|e| DumpError::Encode(e.to_string()))
            }
            (format, other) => Err(DumpError::Shape {
                format,
                found: other.kind(),
            }),
        }
    }
}

fn into_map(value: Value) -> Result<State, String> {
    match value {
        Value::Null => Ok(State::Map(Map::new())),
        Value::Object(map) => Ok(State::Map(map)),
        other => Err(format!("expected a mapping, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
