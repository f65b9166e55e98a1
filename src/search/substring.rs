use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::types::{Entry, LangPair};
use crate::index::memory_index::MemoryIndex;

/// Entries of `pair` whose source contains `phrase` verbatim (case
/// sensitive), oldest first.
pub fn substring_search(index: &MemoryIndex, pair: &LangPair, phrase: &str) -> Vec<Arc<Entry>> {
    if phrase.is_empty() {
        return Vec::new();
    }
    let Some(inverted) = index.pair(pair) else {
        return Vec::new();
    };

    // With no full trigram in the phrase this is a scan of the whole pair.
    let terms = Analyzer::substring_trigram().terms(phrase);
    let candidates = inverted.documents_with_all(&terms);

    let mut found: Vec<Arc<Entry>> = candidates.iter()
        .filter_map(|ord| index.document(ord))
        .filter(|entry| entry.source.contains(phrase))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::core::types::Language;

    fn lang(tag: &str) -> Language {
        Language::parse(tag).unwrap()
    }

    fn sample() -> MemoryIndex {
        let mut index = MemoryIndex::new(Arc::new(Analyzer::trigram()));
        let base = Utc::now();
        for (i, (source, translation)) in [
            ("Open file", "Ouvrir le fichier"),
            ("Open folder", "Ouvrir le dossier"),
            ("Close file", "Fermer le fichier"),
        ].iter().enumerate() {
            index.insert(Entry::new(
                lang("en"),
                lang("fr"),
                source.to_string(),
                translation.to_string(),
                base + Duration::seconds(i as i64),
            )).unwrap();
        }
        index
    }

    #[test]
    fn finds_literal_phrase_in_order() {
        let index = sample();
        let pair = LangPair::new(lang("en"), lang("fr"));
        let found: Vec<_> = substring_search(&index, &pair, "Open")
            .iter()
            .map(|e| e.source.clone())
            .collect();
        assert_eq!(found, vec!["Open file", "Open folder"]);
    }

    #[test]
    fn phrase_may_cut_through_words() {
        let index = sample();
        let pair = LangPair::new(lang("en"), lang("fr"));
        let found = substring_search(&index, &pair, "en fi");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "Open file");

        assert_eq!(substring_search(&index, &pair, "e").len(), 3);
    }

    #[test]
    fn match_is_case_sensitive() {
        let index = sample();
        let pair = LangPair::new(lang("en"), lang("fr"));
        assert!(substring_search(&index, &pair, "open").is_empty());
        assert!(substring_search(&index, &pair, "").is_empty());
    }
}
