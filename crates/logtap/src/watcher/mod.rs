//! Watcher — runs one follow loop per resolved file and fans records out to
//! the registered handlers.
//!
//! Every loop shares one cancellation token. `start()` returns once all loops
//! have exited; `stop()` may be called any number of times from anywhere.

pub mod handler;
pub mod resolve;
pub mod target;

pub use handler::{Handler, HandlerRegistry};
pub use resolve::{is_glob, resolve_files};
pub use target::{TargetProgress, WatchTarget};

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{Result, WatchError};
use crate::metrics::IngestMetrics;
use crate::parser::{LineParser, NormalizedRecord};
use crate::source::{read_to_end, FileSource, SourceOptions, DEFAULT_MAX_LINE_BYTES, DEFAULT_READ_CHUNK};

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Paths or glob patterns, in watch order
    pub files: Vec<String>,
    /// Service name for every record instead of inferring it from the filename
    pub service: Option<String>,
    pub backfill_lines: usize,
    pub poll_interval: Duration,
    pub max_line_bytes: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            service: None,
            backfill_lines: 10,
            poll_interval: Duration::from_millis(250),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

#[derive(Debug)]
pub struct Watcher {
    targets: Vec<WatchTarget>,
    options: SourceOptions,
    handlers: Arc<HandlerRegistry>,
    metrics: Arc<IngestMetrics>,
    cancel: CancellationToken,
}

impl Watcher {
    /// Resolve the file list. Fails on invalid pattern syntax or when
    /// nothing at all is left to watch.
    pub fn new(config: WatcherConfig) -> Result<Self> {
        let paths = resolve_files(&config.files)?;
        let targets: Vec<WatchTarget> = paths
            .into_iter()
            .map(|path| WatchTarget::new(path, config.service.as_deref()))
            .collect();

        info!(files = targets.len(), "watcher configured");

        Ok(Self {
            targets,
            options: SourceOptions {
                backfill_lines: config.backfill_lines,
                poll_interval: config.poll_interval,
                max_line_bytes: config.max_line_bytes,
                read_chunk_bytes: DEFAULT_READ_CHUNK,
            },
            handlers: Arc::new(HandlerRegistry::new()),
            metrics: Arc::new(IngestMetrics::new()),
            cancel: CancellationToken::new(),
        })
    }

    /// Register a record consumer. Handlers run in registration order.
    pub fn add_handler<F>(&self, handler: F)
    where
        F: Fn(&NormalizedRecord) + Send + Sync + 'static,
    {
        self.handlers.add(Arc::new(handler));
    }

    pub fn add_shared_handler(&self, handler: Handler) {
        self.handlers.add(handler);
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        &self.metrics
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Follow every target until [`stop`](Self::stop) is called.
    ///
    /// A file whose loop hits an I/O error is logged and dropped; the others
    /// keep running. Only a panicking loop is reported, after all have exited.
    pub async fn start(&self) -> Result<()> {
        info!(files = self.targets.len(), "watcher started");
        let mut tasks = JoinSet::new();

        for target in &self.targets {
            let source = FileSource::new(target.clone(), self.options.clone(), self.metrics.clone());
            let parser = LineParser::new(target.source_path(), target.service());
            let handlers = self.handlers.clone();
            let metrics = self.metrics.clone();
            let cancel = self.cancel.clone();
            let path = source.target().path().to_path_buf();

            tasks.spawn(async move {
                metrics.loop_started();
                let result = source
                    .follow(cancel, |line| {
                        let record = parser.parse(&line.text);
                        metrics.record_line(&record);
                        handlers.dispatch(&record);
                    })
                    .await;
                metrics.loop_finished();

                if let Err(e) = result {
                    metrics.record_file_error();
                    warn!(path = %path.display(), error = %e, "file loop stopped after I/O error");
                }
            });
        }

        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "file loop panicked");
                failure.get_or_insert(WatchError::Join(e.to_string()));
            }
        }

        info!("watcher stopped");
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Signal every loop to exit. Idempotent.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            info!("stopping watcher");
        }
        self.cancel.cancel();
    }

    /// Read every target once, in file-list order, without following.
    /// Unreadable files are warned about and skipped. Returns the number of
    /// lines dispatched.
    pub async fn read_all(&self) -> Result<u64> {
        let mut total = 0u64;

        for target in &self.targets {
            if self.cancel.is_cancelled() {
                break;
            }

            let parser = LineParser::new(target.source_path(), target.service());
            let mut dispatched = 0u64;
            let result = read_to_end(target.path(), self.options.max_line_bytes, |line| {
                if line.oversize {
                    self.metrics.record_oversize();
                    warn!(
                        path = %target.path().display(),
                        bytes = line.text.len(),
                        "line exceeded max_line_bytes, emitting it unterminated"
                    );
                }
                let record = parser.parse(&line.text);
                self.metrics.record_line(&record);
                self.handlers.dispatch(&record);
                dispatched += 1;
            })
            .await;

            total += dispatched;
            if let Err(e) = result {
                self.metrics.record_file_error();
                warn!(path = %target.path().display(), error = %e, "skipping unreadable file");
            }
        }

        info!(lines = total, files = self.targets.len(), "read complete");
        Ok(total)
    }
}
