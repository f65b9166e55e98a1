use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::{CommitSummary, TmStats};
use crate::core::transaction::{BatchEffect, TransactionOp};
use crate::core::types::{Entry, LangPair};
use crate::index::memory_index::MemoryIndex;
use crate::mvcc::controller::{Snapshot, SnapshotController};
use crate::search::fuzzy::{fuzzy_search, FuzzyOptions};
use crate::search::results::ScoredEntry;
use crate::search::substring::substring_search;
use crate::storage::checkpoint::Checkpoint;
use crate::storage::file_lock::FileLock;
use crate::storage::layout::StorageLayout;
use crate::storage::merge_policy::{MergePolicy, TieredMergePolicy};
use crate::storage::segment::{Segment, SegmentId};
use crate::storage::segment_reader::SegmentReader;
use crate::storage::segment_writer::SegmentWriter;

/// State only touched with the commit lock held
struct WriteState {
    checkpoint: Checkpoint,
    lock: Option<FileLock>,
}

/// Durable indexed store of committed entries.
///
/// Readers work on the last published snapshot without locking. Commits
/// serialize on `write_state`; a commit becomes visible only after its
/// checkpoint is on disk.
pub struct IndexStore {
    config: Config,
    storage: StorageLayout,
    snapshots: SnapshotController,
    write_state: Mutex<WriteState>,
    merge_policy: Box<dyn MergePolicy>,
    analyzer: Arc<Analyzer>,
    closed: AtomicBool,
}

impl IndexStore {
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let storage = StorageLayout::new(config.storage_path.clone())?;
        let lock = FileLock::acquire(&storage)?;
        let analyzer = Arc::new(Analyzer::trigram());

        let checkpoint = Checkpoint::load(&storage)?.unwrap_or_else(Checkpoint::empty);
        Self::remove_orphans(&storage, &checkpoint)?;

        let mut index = MemoryIndex::new(analyzer.clone());
        for segment in &checkpoint.segments {
            let data = SegmentReader::open(&storage, segment.id)?.read_data()?;
            for id in &data.deletes {
                index.remove(id);
            }
            for entry in data.entries {
                index.insert(entry)?;
            }
        }

        info!(
            path = %storage.base_dir.display(),
            segments = checkpoint.segments.len(),
            documents = index.len(),
            "opened translation memory store"
        );

        Ok(IndexStore {
            merge_policy: Box::new(TieredMergePolicy::new(config.max_segments)),
            config,
            storage,
            snapshots: SnapshotController::new(index),
            write_state: Mutex::new(WriteState {
                checkpoint,
                lock: Some(lock),
            }),
            analyzer,
            closed: AtomicBool::new(false),
        })
    }

    /// Segment files left by commits that never reached their checkpoint.
    fn remove_orphans(storage: &StorageLayout, checkpoint: &Checkpoint) -> Result<()> {
        let live: HashSet<SegmentId> = checkpoint.segments.iter().map(|s| s.id).collect();
        for id in storage.list_segments()? {
            if !live.contains(&id) {
                debug!(segment = %id.0, "removing orphan segment");
                if let Err(e) = fs::remove_file(storage.segment_path(&id)) {
                    warn!(segment = %id.0, error = %e, "failed to remove orphan segment");
                }
            }
        }
        let tmp = storage.checkpoint_tmp_path();
        if tmp.exists() {
            fs::remove_file(tmp)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::lifecycle("Translation memory store is closed"));
        }
        Ok(())
    }

    /// Current committed state.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.ensure_open()?;
        Ok(self.snapshots.current_snapshot())
    }

    /// Apply `ops` atomically. Either the checkpoint naming the new segment
    /// is written and the new snapshot published, or nothing changes. The
    /// one exception is a failed directory sync after the checkpoint rename:
    /// the batch is then live but reported as an error, and retrying it is
    /// harmless.
    pub fn commit(&self, ops: &[TransactionOp]) -> Result<CommitSummary> {
        let mut state = self.write_state.lock();
        self.ensure_open()?;

        if ops.is_empty() {
            return Ok(CommitSummary::default());
        }

        let base = self.snapshots.current_snapshot();
        let mut index = base.index.clone();
        let effect = BatchEffect::apply(&base.index, &mut index, ops)?;
        if effect.is_noop() {
            debug!(ops = ops.len(), "commit had no net effect");
            return Ok(CommitSummary::default());
        }

        let mut segment_writer = SegmentWriter::new(SegmentId::new(), self.config.compression);
        for id in &effect.deleted {
            segment_writer.add_delete(*id);
        }
        for entry in &effect.inserted {
            segment_writer.add_entry(entry.clone());
        }
        let segment = if segment_writer.is_empty() {
            None
        } else {
            Some(segment_writer.finish(&self.storage, self.config.sync_writes)?)
        };

        let mut checkpoint = state.checkpoint.clone();
        let obsolete = if effect.reset {
            std::mem::take(&mut checkpoint.segments)
        } else {
            Vec::new()
        };
        if let Some(segment) = &segment {
            checkpoint.segments.push(segment.clone());
        }
        checkpoint.generation += 1;
        checkpoint.timestamp = Utc::now();
        checkpoint.doc_count = index.len();

        if let Err(e) = checkpoint.install(&self.storage, self.config.sync_writes) {
            if let Some(segment) = &segment {
                let _ = fs::remove_file(self.storage.segment_path(&segment.id));
            }
            return Err(e);
        }

        // The rename is the commit point; from here on the new segment is
        // referenced on disk and must stay.
        state.checkpoint = checkpoint;
        let published = self.snapshots.publish(index);

        info!(
            version = published.version,
            ops = ops.len(),
            inserted = effect.inserted.len(),
            deleted = effect.deleted.len(),
            reset = effect.reset,
            segment = ?segment.as_ref().map(|s| s.id.0),
            documents = published.index.len(),
            "committed translation memory batch"
        );

        if let Err(e) = self.sync_checkpoint_dir() {
            warn!(
                version = published.version,
                error = %e,
                "checkpoint installed but not synced; keeping replaced segments"
            );
            return Err(e);
        }

        self.remove_segment_files(&obsolete);

        if self.merge_policy.should_merge(&state.checkpoint.segments) {
            if let Err(e) = self.merge_segments(&mut state, &published) {
                warn!(error = %e, "segment merge failed; store keeps unmerged segments");
            }
        }

        Ok(CommitSummary {
            inserted: effect.inserted.len(),
            deleted: effect.deleted.len(),
            reset: effect.reset,
            version: Some(published.version),
        })
    }

    /// Rewrite the live entries of `snapshot` as one segment.
    fn merge_segments(&self, state: &mut WriteState, snapshot: &Snapshot) -> Result<()> {
        let mut segment_writer = SegmentWriter::new(SegmentId::new(), self.config.compression);
        for entry in snapshot.index.entries_sorted() {
            segment_writer.add_entry((*entry).clone());
        }

        let merged: Option<Segment> = if segment_writer.is_empty() {
            None
        } else {
            Some(segment_writer.finish(&self.storage, self.config.sync_writes)?)
        };

        let mut checkpoint = state.checkpoint.clone();
        let obsolete = std::mem::take(&mut checkpoint.segments);
        checkpoint.segments.extend(merged.clone());
        checkpoint.generation += 1;
        checkpoint.timestamp = Utc::now();

        if let Err(e) = checkpoint.install(&self.storage, self.config.sync_writes) {
            if let Some(segment) = &merged {
                let _ = fs::remove_file(self.storage.segment_path(&segment.id));
            }
            return Err(e);
        }
        state.checkpoint = checkpoint;
        self.sync_checkpoint_dir()?;

        info!(merged = obsolete.len(), documents = snapshot.index.len(), "merged segments");
        self.remove_segment_files(&obsolete);
        Ok(())
    }

    fn sync_checkpoint_dir(&self) -> Result<()> {
        if self.config.sync_writes {
            StorageLayout::sync_dir(&self.storage.meta_dir)?;
        }
        Ok(())
    }

    fn remove_segment_files(&self, segments: &[Segment]) {
        for segment in segments {
            if let Err(e) = fs::remove_file(self.storage.segment_path(&segment.id)) {
                warn!(segment = %segment.id.0, error = %e, "failed to remove obsolete segment");
            }
        }
    }

    /// Drop every entry and every data file. Works on an empty store and
    /// after earlier failed writes; only a closed store refuses.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.write_state.lock();
        self.ensure_open()?;

        // The empty checkpoint goes first so a crash mid-reset never leaves
        // a checkpoint naming deleted segments.
        self.storage.ensure_dirs()?;
        let checkpoint = Checkpoint {
            generation: state.checkpoint.generation + 1,
            ..Checkpoint::empty()
        };
        checkpoint.save(&self.storage, self.config.sync_writes)?;
        state.checkpoint = checkpoint;

        let published = self.snapshots.publish(MemoryIndex::new(self.analyzer.clone()));
        info!(version = published.version, "translation memory reset");

        // Leftovers are orphans now and get collected on the next open.
        match self.storage.list_segments() {
            Ok(ids) => {
                for id in ids {
                    if let Err(e) = fs::remove_file(self.storage.segment_path(&id)) {
                        warn!(segment = %id.0, error = %e, "failed to remove segment after reset");
                    }
                }
            }
            Err(e) => warn!(error = %e, "failed to list segments after reset"),
        }
        Ok(())
    }

    pub fn fuzzy_search(&self, pair: &LangPair, query: &str) -> Result<Vec<ScoredEntry>> {
        let snapshot = self.snapshot()?;
        let options = FuzzyOptions::from(&self.config);
        Ok(fuzzy_search(&snapshot.index, pair, query, &options))
    }

    pub fn substring_search(&self, pair: &LangPair, phrase: &str) -> Result<Vec<Arc<Entry>>> {
        let snapshot = self.snapshot()?;
        Ok(substring_search(&snapshot.index, pair, phrase))
    }

    /// Every committed entry, oldest first.
    pub fn entries(&self) -> Result<Vec<Arc<Entry>>> {
        Ok(self.snapshot()?.index.entries_sorted())
    }

    pub fn stats(&self) -> Result<TmStats> {
        let snapshot = self.snapshot()?;
        let segment_count = self.write_state.lock().checkpoint.segments.len();
        Ok(TmStats {
            document_count: snapshot.index.len(),
            size_bytes: self.storage.size_bytes()?,
            segment_count,
            version: snapshot.version,
        })
    }

    /// Waits for an in-flight commit, then refuses all further work and
    /// releases the directory lock.
    pub fn close(&self) {
        let mut state = self.write_state.lock();
        if !self.closed.swap(true, Ordering::AcqRel) {
            state.lock = None;
            info!(path = %self.storage.base_dir.display(), "closed translation memory store");
        }
    }
}

impl Drop for IndexStore {
    fn drop(&mut self) {
        self.close();
    }
}
