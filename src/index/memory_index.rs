use std::collections::HashMap;
use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Entry, EntryId, LangPair};
use crate::index::inverted::{DocOrd, InvertedIndex};

/// All committed entries plus one inverted index per language pair.
///
/// Cloning is shallow for entries and per-pair indexes; a commit clones the
/// current index and only deep-copies the pairs it touches.
#[derive(Clone)]
pub struct MemoryIndex {
    docs: HashMap<DocOrd, Arc<Entry>>,
    ids: HashMap<EntryId, DocOrd>,
    pairs: HashMap<LangPair, Arc<InvertedIndex>>,
    next_ord: DocOrd,
    analyzer: Arc<Analyzer>,
}

impl MemoryIndex {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        MemoryIndex {
            docs: HashMap::new(),
            ids: HashMap::new(),
            pairs: HashMap::new(),
            next_ord: 0,
            analyzer,
        }
    }

    /// Insert, replacing any entry with the same id.
    pub fn insert(&mut self, entry: Entry) -> Result<()> {
        self.remove(&entry.id);

        let ord = self.next_ord;
        self.next_ord = self.next_ord.checked_add(1).ok_or_else(|| {
            Error::new(ErrorKind::Internal, "Document ordinal space exhausted; reopen the store".to_string())
        })?;

        let terms = self.analyzer.terms(&entry.source);
        let pair = Arc::make_mut(self.pairs.entry(entry.lang_pair()).or_default());
        pair.add_document(ord, &terms);

        self.ids.insert(entry.id, ord);
        self.docs.insert(ord, Arc::new(entry));
        Ok(())
    }

    /// Remove by id; absent ids are ignored.
    pub fn remove(&mut self, id: &EntryId) -> Option<Arc<Entry>> {
        let ord = self.ids.remove(id)?;
        let entry = self.docs.remove(&ord)?;

        let key = entry.lang_pair();
        if let Some(pair) = self.pairs.get_mut(&key) {
            let terms = self.analyzer.terms(&entry.source);
            let pair = Arc::make_mut(pair);
            pair.remove_document(ord, &terms);
            if pair.is_empty() {
                self.pairs.remove(&key);
            }
        }
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.ids.clear();
        self.pairs.clear();
        self.next_ord = 0;
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains_key(id)
    }

    pub fn get(&self, id: &EntryId) -> Option<&Arc<Entry>> {
        self.ids.get(id).and_then(|ord| self.docs.get(ord))
    }

    pub fn document(&self, ord: DocOrd) -> Option<&Arc<Entry>> {
        self.docs.get(&ord)
    }

    pub fn pair(&self, pair: &LangPair) -> Option<&InvertedIndex> {
        self.pairs.get(pair).map(|p| p.as_ref())
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Every entry, oldest first, ties broken by id.
    pub fn entries_sorted(&self) -> Vec<Arc<Entry>> {
        let mut entries: Vec<_> = self.docs.values().cloned().collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        entries
    }
}
