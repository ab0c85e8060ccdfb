use crate::parser::timestamp;
use crate::parser::traits::*;

/// Plain text parser (heuristic; never fails)
#[derive(Debug, Default)]
pub struct PlainTextParser;

impl FormatParser for PlainTextParser {
    fn parse(&self, line: &str) -> Result<ParsedLine, ParseError> {
        Ok(ParsedLine {
            timestamp: timestamp::find_in_text(line),
            level: Level::detect(line),
            message: line.to_string(),
            attributes: Attributes::new(),
        })
    }

    fn kind(&self) -> LineKind {
        LineKind::PlainText
    }
}
