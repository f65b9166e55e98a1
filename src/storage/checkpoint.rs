use std::fs::{self, File};
use std::io::Write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::storage::layout::StorageLayout;
use crate::storage::segment::Segment;
use crate::core::error::{Error, Result};

/// List of live segments in replay order. Replacing this file is the
/// commit point of every transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub generation: u64,
    pub segments: Vec<Segment>,
    pub timestamp: DateTime<Utc>,
    pub doc_count: usize,
}

impl Checkpoint {
    pub fn empty() -> Self {
        Checkpoint {
            generation: 0,
            segments: Vec::new(),
            timestamp: Utc::now(),
            doc_count: 0,
        }
    }

    /// Load checkpoint from disk
    pub fn load(storage: &StorageLayout) -> Result<Option<Self>> {
        let path = storage.checkpoint_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(path)?;
        let checkpoint = bincode::deserialize(&data)
            .map_err(|e| Error::corruption(format!("Checkpoint: {}", e)))?;
        Ok(Some(checkpoint))
    }

    /// Write to a temp file, then rename over the live checkpoint and sync
    /// the directory.
    pub fn save(&self, storage: &StorageLayout, sync: bool) -> Result<()> {
        self.install(storage, sync)?;
        if sync {
            StorageLayout::sync_dir(&storage.meta_dir)?;
        }
        Ok(())
    }

    /// Write to a temp file and rename it over the live checkpoint. Once
    /// this returns Ok the new checkpoint is the one a reopen will load;
    /// an error means the previous checkpoint is still in place.
    pub fn install(&self, storage: &StorageLayout, sync: bool) -> Result<()> {
        let data = bincode::serialize(self)?;
        let tmp_path = storage.checkpoint_tmp_path();

        let mut file = File::create(&tmp_path)?;
        file.write_all(&data)?;
        if sync {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&tmp_path, storage.checkpoint_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::segment::{SegmentId, SegmentMetadata};

    #[test]
    fn missing_checkpoint_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();
        assert!(Checkpoint::load(&storage).unwrap().is_none());
    }

    #[test]
    fn save_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut checkpoint = Checkpoint::empty();
        checkpoint.save(&storage, true).unwrap();

        checkpoint.generation = 7;
        checkpoint.segments.push(Segment {
            id: SegmentId::new(),
            entry_count: 3,
            delete_count: 0,
            metadata: SegmentMetadata {
                created_at: Utc::now(),
                size_bytes: 120,
            },
        });
        checkpoint.save(&storage, true).unwrap();

        let loaded = Checkpoint::load(&storage).unwrap().unwrap();
        assert_eq!(loaded.generation, 7);
        assert_eq!(loaded.segments.len(), 1);
        assert_eq!(loaded.segments[0].id, checkpoint.segments[0].id);
        assert_eq!(loaded.segments[0].entry_count, 3);
        assert!(!storage.checkpoint_tmp_path().exists());
    }

    #[test]
    fn failed_install_keeps_previous_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut checkpoint = Checkpoint::empty();
        checkpoint.generation = 3;
        checkpoint.save(&storage, false).unwrap();

        // A directory in the way of the temp file makes the write fail.
        fs::create_dir(storage.checkpoint_tmp_path()).unwrap();
        checkpoint.generation = 4;
        assert!(checkpoint.install(&storage, false).is_err());

        let loaded = Checkpoint::load(&storage).unwrap().unwrap();
        assert_eq!(loaded.generation, 3);
    }
}
