use parking_lot::RwLock;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::index::memory_index::MemoryIndex;

/// Committed state at a point in time. Readers hold an `Arc` to it and never
/// see later commits or uncommitted writes.
pub struct Snapshot {
    pub version: u64,
    pub index: MemoryIndex,
    pub timestamp: DateTime<Utc>,
}

/// Publishes snapshots; a swap of the current `Arc` is the visibility point.
pub struct SnapshotController {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotController {
    pub fn new(index: MemoryIndex) -> Self {
        SnapshotController {
            current: RwLock::new(Arc::new(Snapshot {
                version: 0,
                index,
                timestamp: Utc::now(),
            })),
        }
    }

    pub fn current_snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Callers serialize publishing (the store's commit lock); versions are
    /// strictly increasing.
    pub fn publish(&self, index: MemoryIndex) -> Arc<Snapshot> {
        let mut current = self.current.write();
        let snapshot = Arc::new(Snapshot {
            version: current.version + 1,
            index,
            timestamp: Utc::now(),
        });
        *current = snapshot.clone();
        snapshot
    }
}
