use crate::parser::traits::*;
use crate::parser::timestamp;
use serde_json::{Map, Value};

/// Message keys, highest priority first. The winning key is removed from attributes.
pub const MESSAGE_FIELDS: &[&str] = &["message", "msg", "log", "text", "body"];

/// Level keys, highest priority first.
pub const LEVEL_FIELDS: &[&str] = &["level", "severity", "lvl", "log.level", "loglevel"];

/// Timestamp keys, highest priority first.
pub const TIME_FIELDS: &[&str] = &["timestamp", "time", "ts", "@timestamp", "datetime"];

/// JSON object parser
#[derive(Debug, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonParser {
    fn parse(&self, line: &str) -> Result<ParsedLine, ParseError> {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            return Err(ParseError::NotJson);
        }

        let value: Value = serde_json::from_str(trimmed)?;
        let mut obj = match value {
            Value::Object(obj) => obj,
            _ => return Err(ParseError::NotAnObject),
        };

        let message = take_message(&mut obj);
        let level = first_present(&obj, LEVEL_FIELDS)
            .map(level_from_value)
            .unwrap_or(Level::Unknown);
        // First present key decides; an unparsable value does not fall
        // through to lower-priority keys.
        let timestamp = first_present(&obj, TIME_FIELDS).and_then(timestamp::from_json);

        let attributes = obj
            .into_iter()
            .map(|(k, v)| (k, AttrValue::from_json(v)))
            .collect();

        Ok(ParsedLine {
            timestamp,
            level,
            message,
            attributes,
        })
    }

    fn kind(&self) -> LineKind {
        LineKind::Structured
    }
}

// Helper functions

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn take_message(obj: &mut Map<String, Value>) -> String {
    for key in MESSAGE_FIELDS {
        if let Some(value) = obj.remove(*key) {
            return match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        }
    }
    String::new()
}

fn level_from_value(value: &Value) -> Level {
    match value {
        Value::String(s) => Level::normalize(s),
        _ => Level::Unknown,
    }
}
