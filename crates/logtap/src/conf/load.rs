//! Load — config loading from file and environment variables.

use std::path::Path;
use tracing::{info, warn};

use super::model::LogtapConfig;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "logtap.toml";

impl LogtapConfig {
    /// Load configuration.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("LOGTAP_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            info!("Config file not found at {}, using defaults and environment", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay `LOGTAP_*` variables (and `NO_COLOR`) read through `var`.
    /// Unparseable values are warned about and ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(files) = var("LOGTAP_FILES") {
            self.files = files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(service) = var("LOGTAP_SERVICE") {
            self.service = Some(service).filter(|s| !s.trim().is_empty());
        }
        if let Some(n) = parsed(&var, "LOGTAP_BACKFILL_LINES", str::parse::<usize>) {
            self.backfill_lines = n;
        }
        if let Some(follow) = parsed(&var, "LOGTAP_FOLLOW", parse_bool) {
            self.follow = follow;
        }
        if let Some(no_color) = parsed(&var, "LOGTAP_NO_COLOR", parse_bool) {
            self.no_color = no_color;
        }
        // https://no-color.org: any non-empty value disables color
        if var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.no_color = true;
        }
        if let Some(show) = parsed(&var, "LOGTAP_SHOW_FILENAMES", parse_bool) {
            self.show_filenames = Some(show);
        }
        if let Some(ms) = parsed(&var, "LOGTAP_POLL_INTERVAL_MS", str::parse::<u64>) {
            self.poll_interval_ms = ms;
        }
        if let Some(bytes) = parsed(&var, "LOGTAP_MAX_LINE_BYTES", str::parse::<usize>) {
            self.max_line_bytes = bytes;
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "files must list at least one path or pattern".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".to_string()));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::Invalid("max_line_bytes must be > 0".to_string()));
        }
        Ok(())
    }
}

fn parsed<F, T, E>(var: &F, key: &str, parse: fn(&str) -> Result<T, E>) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = var(key)?;
    match parse(raw.trim()) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: LogtapConfig = toml::from_str(
            r#"
            files = ["from-file.log"]
            backfill_lines = 5
            follow = true
            "#,
        )
        .unwrap();

        config.apply_env(env(&[
            ("LOGTAP_FILES", "a.log, /var/log/*.log,,"),
            ("LOGTAP_BACKFILL_LINES", "0"),
            ("LOGTAP_FOLLOW", "false"),
            ("LOGTAP_SHOW_FILENAMES", "yes"),
            ("LOGTAP_SERVICE", "api"),
        ]));

        assert_eq!(config.files, vec!["a.log", "/var/log/*.log"]);
        assert_eq!(config.backfill_lines, 0);
        assert!(!config.follow);
        assert_eq!(config.show_filenames, Some(true));
        assert_eq!(config.service.as_deref(), Some("api"));
    }

    #[test]
    fn test_bad_env_values_ignored() {
        let mut config = LogtapConfig::default();
        config.apply_env(env(&[
            ("LOGTAP_POLL_INTERVAL_MS", "soon"),
            ("LOGTAP_FOLLOW", "maybe"),
        ]));
        assert_eq!(config.poll_interval_ms, 250);
        assert!(config.follow);
    }

    #[test]
    fn test_no_color_convention() {
        let mut config = LogtapConfig::default();
        config.apply_env(env(&[("NO_COLOR", "")]));
        assert!(!config.no_color);

        config.apply_env(env(&[("NO_COLOR", "1")]));
        assert!(config.no_color);
    }

    #[test]
    fn test_blank_service_override_ignored() {
        let mut config = LogtapConfig::default();
        config.apply_env(env(&[("LOGTAP_SERVICE", "  ")]));
        assert_eq!(config.service, None);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "files = [\"x.log\"]\npoll_interval_ms = 20").unwrap();

        let config = LogtapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.files, vec!["x.log"]);
        assert_eq!(config.poll_interval_ms, 20);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = LogtapConfig::from_file(dir.path().join("none.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "files = [").unwrap();
        assert!(matches!(LogtapConfig::from_file(&bad), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_validate() {
        let mut config = LogtapConfig::default();
        assert!(config.validate().is_err());

        config.files = vec!["a.log".into()];
        assert!(config.validate().is_ok());

        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.poll_interval_ms = 10;
        config.max_line_bytes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
