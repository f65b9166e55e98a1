use std::collections::HashSet;
use crate::core::error::Result;
use crate::core::types::{Entry, EntryId};
use crate::index::memory_index::MemoryIndex;

/// Buffered write operation
#[derive(Debug, Clone)]
pub enum TransactionOp {
    Insert(Entry),
    Delete(EntryId),
    DeleteAll,
}

/// What a batch changes relative to the state it was applied to: the part
/// that has to reach disk.
#[derive(Debug, Default)]
pub struct BatchEffect {
    /// A `DeleteAll` ran; earlier segments are dropped.
    pub reset: bool,
    /// Ids live before the batch and removed by it.
    pub deleted: Vec<EntryId>,
    /// Entries live after the batch that it inserted, oldest first.
    pub inserted: Vec<Entry>,
}

impl BatchEffect {
    /// Apply `ops` in order to `index`, a copy of `base`. Later operations
    /// win per id.
    pub fn apply(base: &MemoryIndex, index: &mut MemoryIndex, ops: &[TransactionOp]) -> Result<Self> {
        let mut reset = false;
        let mut deleted: HashSet<EntryId> = HashSet::new();
        let mut inserted: HashSet<EntryId> = HashSet::new();

        for op in ops {
            match op {
                TransactionOp::Insert(entry) => {
                    index.insert(entry.clone())?;
                    inserted.insert(entry.id);
                }
                TransactionOp::Delete(id) => {
                    index.remove(id);
                    inserted.remove(id);
                    if !reset && base.contains(id) {
                        deleted.insert(*id);
                    }
                }
                TransactionOp::DeleteAll => {
                    index.clear();
                    reset = true;
                    deleted.clear();
                    inserted.clear();
                }
            }
        }

        let mut deleted: Vec<EntryId> = deleted.into_iter().collect();
        deleted.sort();

        let mut inserted: Vec<Entry> = inserted.iter()
            .filter_map(|id| index.get(id))
            .map(|entry| (**entry).clone())
            .collect();
        inserted.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(BatchEffect {
            reset,
            deleted,
            inserted,
        })
    }

    pub fn is_noop(&self) -> bool {
        !self.reset && self.deleted.is_empty() && self.inserted.is_empty()
    }
}
