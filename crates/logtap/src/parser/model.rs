use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use serde::Serialize;
use chrono::{DateTime, Utc};

use super::level::Level;

/// How a raw line was classified before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Line decoded as a JSON object
    Structured,
    /// Heuristic free-text handling (also the fallback for malformed JSON)
    PlainText,
}

/// Scalar attribute value carried over from a structured line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl AttrValue {
    /// Map a decoded JSON value onto a scalar.
    /// `null`, arrays and objects keep their compact JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => AttrValue::String(s),
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            other => AttrValue::String(other.to_string()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => f.write_str(s),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

/// The canonical unit produced by the parser and handed to every handler.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    /// Extracted event time, or ingestion time when none was found
    pub timestamp: DateTime<Utc>,

    pub level: Level,

    /// JSON message-like field, or the whole line for plain text
    pub message: String,

    /// Logical source name (override or derived from the filename)
    pub service: String,

    /// Originating file path as configured/resolved
    pub source_path: String,

    /// Remaining JSON keys; always empty for plain text
    pub attributes: Attributes,

    /// Original line, unmodified
    pub raw: String,

    pub is_structured: bool,
}

impl NormalizedRecord {
    pub fn kind(&self) -> LineKind {
        if self.is_structured {
            LineKind::Structured
        } else {
            LineKind::PlainText
        }
    }
}

/// Failure of the structured decode attempt. Never escapes [`super::parse_line`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON is not an object")]
    NotAnObject,

    #[error("Line does not start with '{{'")]
    NotJson,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attr_value_scalars() {
        assert_eq!(AttrValue::from_json(json!("x")), AttrValue::String("x".into()));
        assert_eq!(AttrValue::from_json(json!(42)), AttrValue::Int(42));
        assert_eq!(AttrValue::from_json(json!(1.5)), AttrValue::Float(1.5));
        assert_eq!(AttrValue::from_json(json!(true)), AttrValue::Bool(true));
    }

    #[test]
    fn test_attr_value_non_scalars_become_json_text() {
        assert_eq!(AttrValue::from_json(json!(null)), AttrValue::String("null".into()));
        assert_eq!(
            AttrValue::from_json(json!({"a": 1})),
            AttrValue::String(r#"{"a":1}"#.into())
        );
        assert_eq!(AttrValue::from_json(json!([1, 2])), AttrValue::String("[1,2]".into()));
    }

    #[test]
    fn test_record_serializes_level_and_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("user".to_string(), AttrValue::String("bob".into()));
        attributes.insert("count".to_string(), AttrValue::Int(3));

        let record = NormalizedRecord {
            timestamp: DateTime::from_timestamp(1_705_314_645, 0).unwrap(),
            level: Level::Warn,
            message: "hello".to_string(),
            service: "api".to_string(),
            source_path: "/var/log/api.log".to_string(),
            attributes,
            raw: "raw".to_string(),
            is_structured: true,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["attributes"]["user"], "bob");
        assert_eq!(value["attributes"]["count"], 3);
        assert_eq!(value["timestamp"], "2024-01-15T10:30:45Z");
        assert_eq!(record.kind(), LineKind::Structured);
    }
}
