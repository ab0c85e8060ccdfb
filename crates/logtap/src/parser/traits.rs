use chrono::{DateTime, Utc};

pub use super::level::Level;
pub use super::model::{AttrValue, Attributes, LineKind, NormalizedRecord, ParseError};

/// Format-specific fields extracted from one line, before the file context
/// (source path, service, raw text) is attached.
#[derive(Debug, Clone, Default)]
pub struct ParsedLine {
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Level,
    pub message: String,
    pub attributes: Attributes,
}

pub trait FormatParser: Send + Sync {
    /// parse one line (without its terminator) into format-specific fields
    fn parse(&self, line: &str) -> Result<ParsedLine, ParseError>;
    fn kind(&self) -> LineKind;
}
