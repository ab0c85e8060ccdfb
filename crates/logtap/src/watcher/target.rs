//! Target — one concrete file under observation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::parser::resolve_service;

/// Live read progress, written by the file loop and readable from anywhere.
#[derive(Debug, Default)]
pub struct TargetProgress {
    position: AtomicU64,
    generation: AtomicU64,
}

/// A resolved path plus the service name resolved for it once at construction.
///
/// Cloning shares the progress counters.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    path: PathBuf,
    source_path: String,
    service: String,
    progress: Arc<TargetProgress>,
}

impl WatchTarget {
    pub fn new(path: impl Into<PathBuf>, service_override: Option<&str>) -> Self {
        let path = path.into();
        let source_path = path.to_string_lossy().into_owned();
        let service = resolve_service(&source_path, service_override);

        Self {
            path,
            source_path,
            service,
            progress: Arc::new(TargetProgress::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as carried in records' `source_path`.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Current read offset into the current generation of the file.
    pub fn position(&self) -> u64 {
        self.progress.position.load(Ordering::Acquire)
    }

    /// Number of rotations/truncations detected so far.
    pub fn rotation_generation(&self) -> u64 {
        self.progress.generation.load(Ordering::Acquire)
    }

    pub(crate) fn set_position(&self, position: u64) {
        self.progress.position.store(position, Ordering::Release);
    }

    /// Start a new generation: offset resets to the start of the new file.
    pub(crate) fn next_generation(&self) -> u64 {
        self.progress.position.store(0, Ordering::Release);
        self.progress.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}
