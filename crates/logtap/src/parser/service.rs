//! Service — logical service name inferred from a log file path.

use std::path::Path;

pub const UNKNOWN_SERVICE: &str = "unknown";

/// Stream-style suffixes, tried in order; at most one is stripped.
const STREAM_SUFFIXES: &[&str] = &["-err", "-error", "-out", "-info", "-debug", "-log"];

/// Derive a service name from a file path.
///
/// Basename, minus extension, minus one trailing stream suffix
/// (`server-err.log` → `server`). An empty result yields `"unknown"`.
pub fn service_from_filename(path: &str) -> String {
    let base = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    // A leading dot counts as an extension separator, so ".log" strips to "".
    let stem = match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base,
    };

    let name = strip_stream_suffix(stem);
    if name.is_empty() {
        UNKNOWN_SERVICE.to_string()
    } else {
        name.to_string()
    }
}

/// Resolve the service for a target: a non-empty override always wins.
/// The override is trimmed; whitespace alone counts as no override.
pub fn resolve_service(path: &str, service_override: Option<&str>) -> String {
    match service_override.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => service_from_filename(path),
    }
}

fn strip_stream_suffix(stem: &str) -> &str {
    for suffix in STREAM_SUFFIXES {
        if stem.len() < suffix.len() {
            continue;
        }
        let cut = stem.len() - suffix.len();
        if stem.is_char_boundary(cut) && stem[cut..].eq_ignore_ascii_case(suffix) {
            return &stem[..cut];
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_extension_and_suffix() {
        assert_eq!(service_from_filename("server-err.log"), "server");
        assert_eq!(service_from_filename("/var/log/api-out.log"), "api");
        assert_eq!(service_from_filename("worker-ERROR.txt"), "worker");
        assert_eq!(service_from_filename("db-Debug.log"), "db");
    }

    #[test]
    fn test_strips_only_one_suffix() {
        assert_eq!(service_from_filename("app-out-err.log"), "app-out");
        assert_eq!(service_from_filename("app-log.log"), "app");
    }

    #[test]
    fn test_only_last_extension_removed() {
        assert_eq!(service_from_filename("app.2024-01-15.log"), "app.2024-01-15");
        assert_eq!(service_from_filename("nginx"), "nginx");
    }

    #[test]
    fn test_empty_results_are_unknown() {
        assert_eq!(service_from_filename(".log"), "unknown");
        assert_eq!(service_from_filename("-err.log"), "unknown");
        assert_eq!(service_from_filename(""), "unknown");
    }

    #[test]
    fn test_non_ascii_names() {
        assert_eq!(service_from_filename("café-out.log"), "café");
        assert_eq!(service_from_filename("日志.log"), "日志");
    }

    #[test]
    fn test_override_wins_when_non_empty() {
        assert_eq!(resolve_service("server-err.log", Some("billing")), "billing");
        assert_eq!(resolve_service("server-err.log", Some(" billing ")), "billing");
        assert_eq!(resolve_service("server-err.log", Some("  ")), "server");
        assert_eq!(resolve_service("server-err.log", None), "server");
    }
}
