//! Error — watcher and configuration failures.
//!
//! Parse problems never show up here: the parser is total. Per-file I/O
//! failures are logged by the file loop and do not propagate either.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("No files to watch: the file list resolved to zero paths")]
    NoFiles,

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File loop failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;

/// Configuration could not be read or does not describe a usable setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
