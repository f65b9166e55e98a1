use std::mem;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, warn};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::CommitSummary;
use crate::core::store::IndexStore;
use crate::core::transaction::TransactionOp;
use crate::core::types::{Entry, EntryId, Language};
use crate::writer::catalog::{item_pairs, Catalog, CatalogItem};
use crate::writer::entry_sink::EntrySink;

/// Shared transactional writer.
///
/// Operations are buffered in submission order until `commit`. The buffer
/// is shared by every caller: a commit applies whatever is pending at the
/// time it runs.
pub struct Writer {
    store: Arc<IndexStore>,
    pending: Mutex<Vec<TransactionOp>>,
    commit_lock: Mutex<()>,     // Held from taking the buffer until the store answers
    default_source_language: Language,
}

impl Writer {
    pub fn new(store: Arc<IndexStore>, default_source_language: Language) -> Self {
        Writer {
            store,
            pending: Mutex::new(Vec::new()),
            commit_lock: Mutex::new(()),
            default_source_language,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.store.is_closed() {
            error!("translation memory writer used after shutdown");
            return Err(Error::lifecycle("Writer used after the translation memory was shut down"));
        }
        Ok(())
    }

    /// The closed check runs under the buffer lock, which `close` holds
    /// while shutting the store, so an accepted op is never stranded.
    fn push(&self, op: TransactionOp) -> Result<()> {
        let mut pending = self.pending.lock();
        self.ensure_open()?;
        pending.push(op);
        Ok(())
    }

    pub fn insert(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        source: &str,
        translation: &str,
    ) -> Result<EntryId> {
        self.insert_at(source_lang, target_lang, source, translation, Utc::now())
    }

    /// Buffer one entry. Identical content maps to the same id, so the
    /// entry replaces any earlier copy of itself on commit.
    pub fn insert_at(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        source: &str,
        translation: &str,
        created_at: DateTime<Utc>,
    ) -> Result<EntryId> {
        if source.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "Empty source text".to_string()));
        }
        let entry = Entry::new(
            source_lang.clone(),
            target_lang.clone(),
            source.to_string(),
            translation.to_string(),
            created_at,
        );
        let id = entry.id;
        self.push(TransactionOp::Insert(entry))?;
        Ok(id)
    }

    /// Buffer the usable translations of one catalog unit. Returns how many
    /// entries were buffered.
    pub fn insert_item<I: CatalogItem + ?Sized>(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        item: &I,
    ) -> Result<usize> {
        let pairs = item_pairs(item);
        if pairs.is_empty() {
            debug!(source = item.source(), "skipping unusable catalog item");
            return Ok(0);
        }

        let created_at = Utc::now();
        for (source, translation) in &pairs {
            self.insert_at(source_lang, target_lang, source, translation, created_at)?;
        }
        Ok(pairs.len())
    }

    /// Buffer every usable unit of `catalog`.
    pub fn insert_catalog<C: Catalog>(&self, catalog: &C) -> Result<usize> {
        let Some(target_lang) = catalog.target_language().and_then(|tag| Language::parse(tag).ok()) else {
            warn!(
                target = catalog.target_language().unwrap_or_default(),
                "catalog has no usable target language; nothing inserted"
            );
            return Ok(0);
        };

        let source_lang = match catalog.source_language().map(Language::parse) {
            Some(Ok(lang)) => lang,
            _ => {
                debug!(fallback = %self.default_source_language, "catalog source language missing, using default");
                self.default_source_language.clone()
            }
        };

        let mut inserted = 0;
        for item in catalog.items() {
            inserted += self.insert_item(&source_lang, &target_lang, item)?;
        }
        debug!(
            source_lang = %source_lang,
            target_lang = %target_lang,
            units = catalog.items().len(),
            inserted,
            "buffered catalog"
        );
        Ok(inserted)
    }

    pub fn delete(&self, id: EntryId) -> Result<()> {
        self.push(TransactionOp::Delete(id))
    }

    pub fn delete_all(&self) -> Result<()> {
        self.push(TransactionOp::DeleteAll)
    }

    /// Apply everything pending as one all-or-nothing batch. On failure the
    /// batch goes back to the front of the buffer, ahead of anything
    /// buffered meanwhile.
    pub fn commit(&self) -> Result<CommitSummary> {
        let _commit = self.commit_lock.lock();
        self.ensure_open()?;

        let ops = mem::take(&mut *self.pending.lock());
        if ops.is_empty() {
            return Ok(CommitSummary::default());
        }

        match self.store.commit(&ops) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                let mut pending = self.pending.lock();
                let newer = mem::replace(&mut *pending, ops);
                pending.extend(newer);
                Err(e)
            }
        }
    }

    /// Commit whatever is pending and close the store as one step. Writes
    /// racing with this either land in the final batch or fail with a
    /// lifecycle error. The store is closed even when the commit fails.
    pub fn close(&self) -> Result<()> {
        let _commit = self.commit_lock.lock();
        let mut pending = self.pending.lock();
        if self.store.is_closed() {
            return Ok(());
        }

        let ops = mem::take(&mut *pending);
        let result = if ops.is_empty() {
            Ok(())
        } else {
            self.store.commit(&ops).map(|_| ())
        };
        if let Err(e) = &result {
            error!(error = %e, ops = ops.len(), "failed to commit pending writes at shutdown");
        }
        self.store.close();
        result
    }

    /// Discard the buffer. Returns the number of operations dropped.
    pub fn rollback(&self) -> usize {
        let dropped = mem::take(&mut *self.pending.lock()).len();
        if dropped > 0 {
            debug!(ops = dropped, "rolled back pending writes");
        }
        dropped
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl EntrySink for Writer {
    fn insert_entry(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        source: &str,
        translation: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.insert_at(source_lang, target_lang, source, translation, created_at)?;
        Ok(())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().len();
        if pending == 0 {
            return;
        }
        if self.store.is_closed() {
            warn!(ops = pending, "discarding writes buffered after shutdown");
            return;
        }
        if let Err(e) = self.commit() {
            error!(error = %e, ops = self.pending_len(), "failed to commit pending writes on drop");
        }
    }
}
