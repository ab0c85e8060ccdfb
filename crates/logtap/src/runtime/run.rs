//! Run — build the watcher, echo records to stdout, follow or read once.

use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::conf::LogtapConfig;
use crate::format::LineFormatter;
use crate::runtime::stop::shutdown_signal;
use crate::watcher::Watcher;

pub async fn run(config: LogtapConfig) -> Result<(), Box<dyn std::error::Error>> {
    let watcher = Arc::new(Watcher::new(config.to_watcher_config())?);
    for target in watcher.targets() {
        info!(path = %target.path().display(), service = target.service(), "watching");
    }

    let formatter = LineFormatter::new(config.format_options(watcher.targets().len()));
    watcher.add_handler(move |record| {
        let mut out = std::io::stdout().lock();
        // A closed stdout (e.g. piped into `head`) must not stop ingestion.
        let _ = writeln!(out, "{}", formatter.format(record));
    });

    if config.follow {
        let stopper = Arc::clone(&watcher);
        tokio::spawn(async move {
            shutdown_signal().await;
            stopper.stop();
        });
        watcher.start().await?;
    } else {
        let lines = watcher.read_all().await?;
        info!(lines, "One-shot read finished");
    }

    let snapshot = watcher.metrics().snapshot();
    info!(
        metrics = %serde_json::to_string(&snapshot).unwrap_or_default(),
        "Ingestion summary"
    );
    Ok(())
}
