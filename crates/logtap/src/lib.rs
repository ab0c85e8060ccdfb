// Domain-driven module structure for logtap.

// Core pipeline
pub mod parser;
pub mod source;
pub mod watcher;

// Output
pub mod format;
pub mod sink;

// Infrastructure
pub mod conf;
pub mod error;
pub mod metrics;
pub mod runtime;

pub use error::{ConfigError, WatchError};
pub use parser::{parse_line, LineParser, Level, NormalizedRecord};
pub use sink::{Sink, SinkContext};
pub use watcher::{Watcher, WatcherConfig};
