//! Level — severity normalization for structured fields and free text.

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Safe default when nothing could be inferred
    #[default]
    Unknown,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Unknown => "UNKNOWN",
        }
    }

    /// Normalize a level value taken from a structured field.
    pub fn normalize(value: &str) -> Level {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Level::Trace,
            "DEBUG" => Level::Debug,
            "INFO" | "INFORMATION" => Level::Info,
            "WARN" | "WARNING" => Level::Warn,
            "ERROR" | "ERR" => Level::Error,
            "FATAL" | "CRITICAL" | "PANIC" => Level::Fatal,
            _ => Level::Unknown,
        }
    }

    /// Search free text for a level keyword.
    ///
    /// Patterns are tried in fixed priority order and the first one matching
    /// anywhere in the line wins, regardless of position.
    pub fn detect(text: &str) -> Level {
        LEVEL_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map(|(_, level)| *level)
            .unwrap_or(Level::Unknown)
    }
}

static LEVEL_PATTERNS: Lazy<Vec<(Regex, Level)>> = Lazy::new(|| {
    [
        (r"(?i)\bTRACE\b", Level::Trace),
        (r"(?i)\bDEBUG\b", Level::Debug),
        (r"(?i)\bINFO\b", Level::Info),
        (r"(?i)\bWARN(?:ING)?\b", Level::Warn),
        (r"(?i)\bERR(?:OR)?\b", Level::Error),
        (r"(?i)\b(?:FATAL|CRITICAL)\b", Level::Fatal),
    ]
    .into_iter()
    .filter_map(|(pattern, level)| Regex::new(pattern).ok().map(|re| (re, level)))
    .collect()
});

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(Level::normalize("trace"), Level::Trace);
        assert_eq!(Level::normalize("Debug"), Level::Debug);
        assert_eq!(Level::normalize("information"), Level::Info);
        assert_eq!(Level::normalize("warning"), Level::Warn);
        assert_eq!(Level::normalize("err"), Level::Error);
        assert_eq!(Level::normalize("CRITICAL"), Level::Fatal);
        assert_eq!(Level::normalize("panic"), Level::Fatal);
    }

    #[test]
    fn test_normalize_unrecognized_is_unknown() {
        assert_eq!(Level::normalize("notice"), Level::Unknown);
        assert_eq!(Level::normalize(""), Level::Unknown);
        assert_eq!(Level::normalize("30"), Level::Unknown);
    }

    #[test]
    fn test_detect_word_boundaries() {
        assert_eq!(Level::detect("2024-01-15 10:30:45 ERROR boom"), Level::Error);
        assert_eq!(Level::detect("[warning] disk almost full"), Level::Warn);
        assert_eq!(Level::detect("level=info msg=started"), Level::Info);
        // "information" is not a whole-word INFO match
        assert_eq!(Level::detect("some information here"), Level::Unknown);
        assert_eq!(Level::detect("terrible things"), Level::Unknown);
    }

    #[test]
    fn test_detect_priority_order_not_position() {
        // DEBUG outranks ERROR even though ERROR appears first
        assert_eq!(Level::detect("ERROR while handling DEBUG request"), Level::Debug);
        assert_eq!(Level::detect("critical: err=timeout"), Level::Error);
        assert_eq!(Level::detect("FATAL crash"), Level::Fatal);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(serde_json::to_string(&Level::Unknown).unwrap(), "\"UNKNOWN\"");
    }
}
