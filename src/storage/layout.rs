use std::path::{Path, PathBuf};
use std::fs;
use crate::core::error::Result;
use crate::storage::segment::SegmentId;

/// Directory structure for data files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory, holds the lock file
    pub segments_dir: PathBuf,  // Committed batches (.seg files)
    pub meta_dir: PathBuf,      // Checkpoint
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        let segments_dir = base_dir.join("segments");
        let meta_dir = base_dir.join("meta");

        let layout = StorageLayout {
            base_dir,
            segments_dir,
            meta_dir,
        };
        layout.ensure_dirs()?;
        Ok(layout)
    }

    /// Recreate the data directories if something removed them.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.segments_dir)?;
        fs::create_dir_all(&self.meta_dir)?;
        Ok(())
    }

    pub fn segment_path(&self, id: &SegmentId) -> PathBuf {
        self.segments_dir.join(format!("{}.seg", id.0))
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.meta_dir.join("checkpoint.bin")
    }

    pub fn checkpoint_tmp_path(&self) -> PathBuf {
        self.meta_dir.join("checkpoint.tmp")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.base_dir.join(".lock")
    }

    /// Segment ids present on disk, referenced by the checkpoint or not.
    pub fn list_segments(&self) -> Result<Vec<SegmentId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.segments_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("seg") {
                continue;
            }
            if let Some(id) = path.file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
            {
                ids.push(SegmentId(id));
            }
        }
        Ok(ids)
    }

    /// Bytes used by segments and the checkpoint.
    pub fn size_bytes(&self) -> Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.segments_dir)? {
            total += entry?.metadata()?.len();
        }
        if let Ok(meta) = fs::metadata(self.checkpoint_path()) {
            total += meta.len();
        }
        Ok(total)
    }

    /// Make renames inside `dir` durable.
    pub fn sync_dir(dir: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::File::open(dir)?.sync_all()?;
        }
        #[cfg(not(unix))]
        {
            let _ = dir;
        }
        Ok(())
    }
}
