//! Handler registry — consumers of normalized records.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::parser::NormalizedRecord;

/// A record consumer. Called synchronously from the file loop that produced
/// the record; a slow handler slows only that file.
pub type Handler = Arc<dyn Fn(&NormalizedRecord) + Send + Sync>;

/// Ordered handler list. Registration replaces the list, dispatch works on a
/// snapshot, so registering while records flow never blocks a dispatch
/// already in progress.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<Arc<Vec<Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handler: Handler) {
        let mut guard = self.handlers.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(handler);
        *guard = Arc::new(next);
    }

    /// Handlers registered so far, in registration order.
    pub fn snapshot(&self) -> Arc<Vec<Handler>> {
        Arc::clone(&self.handlers.read())
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every handler on `record`, in order.
    pub fn dispatch(&self, record: &NormalizedRecord) {
        for handler in self.snapshot().iter() {
            handler(record);
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}
