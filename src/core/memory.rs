use std::sync::{Arc, OnceLock};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::TmStats;
use crate::core::store::IndexStore;
use crate::core::types::{EntryId, LangPair, Language};
use crate::suggestions::backend::SuggestionsBackend;
use crate::suggestions::future::SuggestionFuture;
use crate::suggestions::types::{Suggestion, SuggestionQuery, SuggestionsList};
use crate::writer::entry_sink::EntrySink;
use crate::writer::transaction_writer::Writer;

/// Translation memory: one store, one shared writer, and a pool running
/// suggestion searches off the caller's thread.
pub struct TranslationMemory {
    store: Arc<IndexStore>,
    writer: OnceLock<Arc<Writer>>,
    search_pool: ThreadPool,
    default_source_language: Language,
}

impl TranslationMemory {
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let default_source_language = Language::parse(&config.default_source_language)?;
        let search_pool = ThreadPoolBuilder::new()
            .num_threads(config.search_threads)
            .thread_name(|i| format!("tm-search-{}", i))
            .build()
            .map_err(|e| Error::new(ErrorKind::Internal, format!("Failed to start search pool: {}", e)))?;

        let store = Arc::new(IndexStore::open(config)?);

        Ok(TranslationMemory {
            store,
            writer: OnceLock::new(),
            search_pool,
            default_source_language,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.store.is_closed() {
            error!("translation memory used after shutdown");
            return Err(Error::lifecycle("Translation memory used after shutdown"));
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        self.store.config()
    }

    /// The shared writer, created on first use.
    pub fn get_writer(&self) -> Result<Arc<Writer>> {
        self.ensure_active()?;
        Ok(self.shared_writer().clone())
    }

    fn shared_writer(&self) -> &Arc<Writer> {
        self.writer.get_or_init(|| {
            debug!("creating shared translation memory writer");
            Arc::new(Writer::new(self.store.clone(), self.default_source_language.clone()))
        })
    }

    /// Ranked suggestions for `source`. No match is an empty list.
    pub fn search(&self, source_lang: &Language, target_lang: &Language, source: &str) -> Result<SuggestionsList> {
        self.ensure_active()?;
        search_store(&self.store, source_lang, target_lang, source)
    }

    /// Remove one entry right away. Anything else pending in the shared
    /// writer is committed along with it.
    pub fn delete(&self, id: EntryId) -> Result<()> {
        let writer = self.get_writer()?;
        writer.delete(id)?;
        writer.commit()?;
        Ok(())
    }

    /// Push every committed entry into `sink`, oldest first. Returns the
    /// number exported.
    pub fn export_data(&self, sink: &dyn EntrySink) -> Result<usize> {
        self.ensure_active()?;
        let entries = self.store.entries()?;
        for entry in &entries {
            sink.insert_entry(
                &entry.source_lang,
                &entry.target_lang,
                &entry.source,
                &entry.translation,
                entry.created_at,
            )?;
        }
        info!(entries = entries.len(), "exported translation memory");
        Ok(entries.len())
    }

    /// Hand the shared writer to `producer`. Committing (or rolling back)
    /// is up to the producer.
    pub fn import_data<F>(&self, producer: F) -> Result<()>
    where
        F: FnOnce(&Writer) -> Result<()>,
    {
        let writer = self.get_writer()?;
        producer(&writer)
    }

    /// Stream entries whose source contains `phrase` into `sink`. Returns
    /// the number of matches.
    pub fn search_substring(
        &self,
        sink: &dyn EntrySink,
        source_lang: &Language,
        target_lang: &Language,
        phrase: &str,
    ) -> Result<usize> {
        self.ensure_active()?;
        let pair = LangPair::new(source_lang.clone(), target_lang.clone());
        let found = self.store.substring_search(&pair, phrase)?;
        for entry in &found {
            sink.insert_entry(
                &entry.source_lang,
                &entry.target_lang,
                &entry.source,
                &entry.translation,
                entry.created_at,
            )?;
        }
        Ok(found.len())
    }

    /// Wipe the memory back to empty, dropping anything pending.
    pub fn delete_all_and_reset(&self) -> Result<()> {
        self.ensure_active()?;
        if let Some(writer) = self.writer.get() {
            writer.rollback();
        }
        self.store.reset()
    }

    /// (document count, approximate size in bytes)
    pub fn get_stats(&self) -> Result<(usize, u64)> {
        let stats = self.stats()?;
        Ok((stats.document_count, stats.size_bytes))
    }

    pub fn stats(&self) -> Result<TmStats> {
        self.ensure_active()?;
        self.store.stats()
    }

    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Commit whatever the shared writer still holds, then close the store.
    /// The store is closed even when that last commit fails.
    pub fn close(&self) -> Result<()> {
        self.ensure_active()?;
        self.shared_writer().close()
    }
}

impl SuggestionsBackend for TranslationMemory {
    fn suggest_translation(&self, query: SuggestionQuery) -> SuggestionFuture {
        if let Err(e) = self.ensure_active() {
            return SuggestionFuture::ready(Err(e));
        }

        let (tx, future) = SuggestionFuture::channel();
        let store = self.store.clone();
        self.search_pool.spawn(move || {
            if tx.is_abandoned() {
                debug!(source = %query.source, "suggestion request abandoned before search");
                return;
            }
            let result = search_store(&store, &query.source_lang, &query.target_lang, &query.source);
            if !tx.send(result) {
                debug!(source = %query.source, "suggestion result discarded");
            }
        });
        future
    }

    fn delete(&self, id: EntryId) -> Result<()> {
        TranslationMemory::delete(self, id)
    }
}

fn search_store(
    store: &IndexStore,
    source_lang: &Language,
    target_lang: &Language,
    source: &str,
) -> Result<SuggestionsList> {
    let pair = LangPair::new(source_lang.clone(), target_lang.clone());
    let hits = store.fuzzy_search(&pair, source)?;
    Ok(hits.iter().map(Suggestion::from).collect())
}
