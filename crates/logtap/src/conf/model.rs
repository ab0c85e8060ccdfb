//! Model — LogtapConfig and the views derived from it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::format::FormatOptions;
use crate::source::DEFAULT_MAX_LINE_BYTES;
use crate::watcher::WatcherConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogtapConfig {
    /// Paths or glob patterns, in watch order
    pub files: Vec<String>,
    /// Overrides the filename-derived service name
    pub service: Option<String>,
    pub backfill_lines: usize,
    /// Keep following after the initial read (false = one-shot import)
    pub follow: bool,
    pub no_color: bool,
    /// `None` shows filenames only when more than one file is watched
    pub show_filenames: Option<bool>,
    pub poll_interval_ms: u64,
    pub max_line_bytes: usize,
}

impl Default for LogtapConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            service: None,
            backfill_lines: 10,
            follow: true,
            no_color: false,
            show_filenames: None,
            poll_interval_ms: 250,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl LogtapConfig {
    pub fn to_watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            files: self.files.clone(),
            service: self.service.clone(),
            backfill_lines: self.backfill_lines,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_line_bytes: self.max_line_bytes,
        }
    }

    /// Formatter settings once the number of watched files is known.
    pub fn format_options(&self, watched_files: usize) -> FormatOptions {
        FormatOptions {
            show_filename: self.show_filenames.unwrap_or(watched_files > 1),
            color: !self.no_color,
            local_time: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LogtapConfig = toml::from_str(
            r#"
            files = ["/var/log/app/*.log"]
            backfill_lines = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.files, vec!["/var/log/app/*.log"]);
        assert_eq!(config.backfill_lines, 0);
        assert!(config.follow);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_line_bytes, 1_048_576);
        assert_eq!(config.show_filenames, None);
    }

    #[test]
    fn test_full_toml() {
        let config: LogtapConfig = toml::from_str(
            r#"
            files = ["a.log", "b.log"]
            service = "payments"
            backfill_lines = 50
            follow = false
            no_color = true
            show_filenames = false
            poll_interval_ms = 100
            max_line_bytes = 4096
            "#,
        )
        .unwrap();

        assert_eq!(config.service.as_deref(), Some("payments"));
        assert!(!config.follow);
        assert!(config.no_color);
        assert_eq!(config.show_filenames, Some(false));

        let watcher = config.to_watcher_config();
        assert_eq!(watcher.poll_interval, Duration::from_millis(100));
        assert_eq!(watcher.max_line_bytes, 4096);
        assert_eq!(watcher.backfill_lines, 50);
    }

    #[test]
    fn test_filename_display_auto() {
        let config = LogtapConfig::default();
        assert!(!config.format_options(1).show_filename);
        assert!(config.format_options(2).show_filename);

        let forced = LogtapConfig {
            show_filenames: Some(true),
            no_color: true,
            ..Default::default()
        };
        let options = forced.format_options(1);
        assert!(options.show_filename);
        assert!(!options.color);
    }
}
