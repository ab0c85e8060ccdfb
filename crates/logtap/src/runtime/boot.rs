//! Boot — logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::LogtapConfig;

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr; stdout carries only echoed records.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logtap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<LogtapConfig, Box<dyn std::error::Error>> {
    info!("Starting logtap v{}", env!("CARGO_PKG_VERSION"));

    let config = LogtapConfig::load()?;
    config.validate().map_err(|e| {
        error!("Configuration rejected: {}", e);
        e
    })?;

    info!(
        "Loaded configuration: files={:?}, follow={}, backfill_lines={}, poll_interval={}ms",
        config.files, config.follow, config.backfill_lines, config.poll_interval_ms
    );
    if let Some(service) = &config.service {
        info!("Service name override: {}", service);
    }

    Ok(config)
}
