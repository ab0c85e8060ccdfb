//! Resolve — configured paths/patterns to the ordered list of files to watch.

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{Result, WatchError};

/// Whether a pattern uses glob syntax and needs expansion.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand every pattern in order.
///
/// A pattern that matches nothing is kept as a literal path so the file can
/// be picked up once it is created. Directories found by expansion are
/// skipped and each path is kept only at its first occurrence.
pub fn resolve_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }

        let mut matched = Vec::new();
        if is_glob(pattern) {
            let entries = glob::glob(pattern).map_err(|e| WatchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_dir() => {
                        debug!(path = %path.display(), "skipping directory matched by pattern");
                    }
                    Ok(path) => matched.push(path),
                    Err(e) => warn!(pattern, error = %e, "unreadable pattern match skipped"),
                }
            }
        } else if PathBuf::from(pattern).exists() {
            matched.push(PathBuf::from(pattern));
        }

        if matched.is_empty() {
            warn!(pattern, "no file matches yet, watching for it to appear");
            matched.push(PathBuf::from(pattern));
        }

        for path in matched {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        return Err(WatchError::NoFiles);
    }
    Ok(files)
}
