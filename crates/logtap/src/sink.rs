//! Sink — the hand-off point to downstream consumers.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::parser::NormalizedRecord;
use crate::watcher::Handler;

/// Per-watcher context handed to every `accept` call.
#[derive(Debug, Clone, Default)]
pub struct SinkContext {
    /// Cancelled when the watcher stops
    pub cancel: CancellationToken,
}

impl SinkContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Destination for normalized records.
///
/// `accept` is fire-and-forget: ingestion never looks at whether delivery
/// worked. Implementations own their buffering and retry policy and must not
/// block for long, since they run inline in a file's read loop.
pub trait Sink: Send + Sync {
    fn accept(&self, record: &NormalizedRecord, ctx: &SinkContext);
}

/// Drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl Sink for NoopSink {
    fn accept(&self, _record: &NormalizedRecord, _ctx: &SinkContext) {}
}

/// Forwards records to an unbounded channel for an async consumer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NormalizedRecord>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NormalizedRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Sink for ChannelSink {
    fn accept(&self, record: &NormalizedRecord, ctx: &SinkContext) {
        if self.tx.send(record.clone()).is_err() && !ctx.is_shutting_down() {
            tracing::debug!("channel sink receiver dropped, record discarded");
        }
    }
}

/// Adapt a sink into a watcher handler.
pub fn sink_handler<S>(sink: Arc<S>, ctx: SinkContext) -> Handler
where
    S: Sink + ?Sized + 'static,
{
    Arc::new(move |record: &NormalizedRecord| sink.accept(record, &ctx))
}
