/// Line classification and normalization
///
/// Turns one raw log line plus its file context into a [`NormalizedRecord`].
///
/// # Architecture
///
/// - `detector.rs`: single-line classification (structured candidate or plain text)
/// - `formats/`: JSON object parser and plain-text heuristic parser
/// - `level.rs` / `timestamp.rs`: severity and time inference
/// - `service.rs`: service-name inference from file paths
///
/// # Totality
///
/// Parsing never fails. Malformed JSON falls back to plain-text handling of
/// the same line, missing fields fall back to safe defaults (UNKNOWN level,
/// ingestion time), and the raw line is always preserved.

pub mod traits;
pub mod detector;
pub mod formats;
pub mod model;
pub mod level;
pub mod timestamp;
pub mod service;

// Re-export commonly used types
pub use traits::{FormatParser, ParsedLine};
pub use model::{AttrValue, Attributes, LineKind, NormalizedRecord, ParseError};
pub use level::Level;
pub use service::{resolve_service, service_from_filename};

use chrono::Utc;
use formats::{JsonParser, PlainTextParser};

/// Parse one line. Pure apart from the "now" fallback timestamp.
pub fn parse_line(line: &str, filename: &str, service_override: &str) -> NormalizedRecord {
    let service = resolve_service(filename, Some(service_override));
    build_record(line, filename, service)
}

/// Parser bound to one file, with the service name resolved once.
#[derive(Debug, Clone)]
pub struct LineParser {
    source_path: String,
    service: String,
}

impl LineParser {
    pub fn new(source_path: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn parse(&self, line: &str) -> NormalizedRecord {
        build_record(line, &self.source_path, self.service.clone())
    }
}

fn build_record(line: &str, source_path: &str, service: String) -> NormalizedRecord {
    let (parsed, kind) = normalize(line);

    NormalizedRecord {
        timestamp: parsed.timestamp.unwrap_or_else(Utc::now),
        level: parsed.level,
        message: parsed.message,
        service,
        source_path: source_path.to_string(),
        attributes: parsed.attributes,
        raw: line.to_string(),
        is_structured: kind == LineKind::Structured,
    }
}

fn normalize(line: &str) -> (ParsedLine, LineKind) {
    if detector::classify(line) == LineKind::Structured {
        match JsonParser.parse(line) {
            Ok(parsed) => return (parsed, JsonParser.kind()),
            Err(e) => {
                tracing::trace!(error = %e, "structured decode failed, using plain text");
            }
        }
    }

    let parsed = PlainTextParser.parse(line).unwrap_or_else(|_| ParsedLine {
        message: line.to_string(),
        ..Default::default()
    });
    (parsed, PlainTextParser.kind())
}
