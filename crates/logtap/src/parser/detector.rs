use super::model::LineKind;

/// Single-line classification (no buffering, no allocation).
/// - First non-whitespace byte `{` → Structured candidate
/// - Everything else → PlainText
///
/// A Structured candidate may still fall back to PlainText if it fails to
/// decode; this only decides which path is tried first.
pub fn classify(line: &str) -> LineKind {
    if line.trim_start().starts_with('{') {
        LineKind::Structured
    } else {
        LineKind::PlainText
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_json_object() {
        assert_eq!(classify(r#"{"level":"info","msg":"hello"}"#), LineKind::Structured);
    }

    #[test]
    fn test_classify_indented_json() {
        assert_eq!(classify("   {\"msg\":\"x\"}"), LineKind::Structured);
    }

    #[test]
    fn test_classify_broken_json_is_still_a_candidate() {
        assert_eq!(classify("{bad json"), LineKind::Structured);
    }

    #[test]
    fn test_classify_plain() {
        assert_eq!(classify("Just some plain text"), LineKind::PlainText);
        assert_eq!(classify(""), LineKind::PlainText);
        assert_eq!(classify("[1,2,3]"), LineKind::PlainText);
    }
}
