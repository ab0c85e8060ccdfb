use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use crate::parser::{Level, NormalizedRecord};

/// Forces the wrapped group onto its own cache line so the per-line counters
/// updated by every file loop do not contend with the rarely touched ones.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Per-line counters (hottest path)
#[derive(Debug, Default)]
pub struct LineMetrics {
    pub total: AtomicU64,
    pub structured: AtomicU64,
    pub plain_text: AtomicU64,
    pub oversize: AtomicU64,
}

/// Counts by normalized level, indexed in [`Level::ALL`] order
#[derive(Debug, Default)]
pub struct LevelMetrics {
    pub counts: [AtomicU64; 7],
}

/// File lifecycle events
#[derive(Debug, Default)]
pub struct FileMetrics {
    pub rotations: AtomicU64,
    pub errors: AtomicU64,
    pub active_loops: AtomicU64,
}

/// Ingestion counters shared by every file loop of a watcher.
///
/// All operations use `Ordering::Relaxed`; `snapshot()` is not transactional
/// across fields.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    pub lines: CacheAligned<LineMetrics>,
    pub levels: CacheAligned<LevelMetrics>,
    pub files: CacheAligned<FileMetrics>,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one dispatched record.
    #[inline]
    pub fn record_line(&self, record: &NormalizedRecord) {
        self.lines.0.total.fetch_add(1, Ordering::Relaxed);
        if record.is_structured {
            self.lines.0.structured.fetch_add(1, Ordering::Relaxed);
        } else {
            self.lines.0.plain_text.fetch_add(1, Ordering::Relaxed);
        }
        self.levels.0.counts[level_index(record.level)].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_oversize(&self) {
        self.lines.0.oversize.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rotation(&self) {
        self.files.0.rotations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_file_error(&self) {
        self.files.0.errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn loop_started(&self) {
        self.files.0.active_loops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn loop_finished(&self) {
        self.files.0.active_loops.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let level = |l: Level| self.levels.0.counts[level_index(l)].load(Ordering::Relaxed);

        MetricsSnapshot {
            lines_total: self.lines.0.total.load(Ordering::Relaxed),
            structured: self.lines.0.structured.load(Ordering::Relaxed),
            plain_text: self.lines.0.plain_text.load(Ordering::Relaxed),
            oversize_lines: self.lines.0.oversize.load(Ordering::Relaxed),

            trace: level(Level::Trace),
            debug: level(Level::Debug),
            info: level(Level::Info),
            warn: level(Level::Warn),
            error: level(Level::Error),
            fatal: level(Level::Fatal),
            unknown: level(Level::Unknown),

            rotations: self.files.0.rotations.load(Ordering::Relaxed),
            file_errors: self.files.0.errors.load(Ordering::Relaxed),
            active_loops: self.files.0.active_loops.load(Ordering::Relaxed),
        }
    }
}

fn level_index(level: Level) -> usize {
    Level::ALL.iter().position(|l| *l == level).unwrap_or(Level::ALL.len() - 1)
}

/// A read-only snapshot of ingestion metrics, suitable for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    // Lines
    pub lines_total: u64,
    pub structured: u64,
    pub plain_text: u64,
    pub oversize_lines: u64,

    // Levels
    pub trace: u64,
    pub debug: u64,
    pub info: u64,
    pub warn: u64,
    pub error: u64,
    pub fatal: u64,
    pub unknown: u64,

    // Files
    pub rotations: u64,
    pub file_errors: u64,
    pub active_loops: u64,
}
