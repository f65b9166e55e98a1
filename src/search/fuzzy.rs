use std::cmp::Ordering;
use crate::core::config::Config;
use crate::core::types::LangPair;
use crate::index::inverted::DocOrd;
use crate::index::memory_index::MemoryIndex;
use crate::scoring::similarity::{normalize, SimilarityScorer};
use crate::search::results::{rank, ScoredEntry};

#[derive(Debug, Clone)]
pub struct FuzzyOptions {
    pub max_results: usize,
    pub min_score: f64,
    pub max_candidates: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        FuzzyOptions::from(&Config::default())
    }
}

impl From<&Config> for FuzzyOptions {
    fn from(config: &Config) -> Self {
        FuzzyOptions {
            max_results: config.max_results,
            min_score: config.min_score,
            max_candidates: config.max_candidates,
        }
    }
}

/// Term overlap between the query and one document.
struct Candidate {
    ord: DocOrd,
    shared: u64,
    union: u64,
}

impl Candidate {
    /// Compare Jaccard overlap `shared / union` without dividing.
    fn cmp_overlap(&self, other: &Candidate) -> Ordering {
        (self.shared * other.union)
            .cmp(&(other.shared * self.union))
            .then(self.shared.cmp(&other.shared))
    }
}

/// Entries of `pair` whose source text resembles `query`, best first.
///
/// Candidates are the documents whose index terms overlap the query's the
/// most relative to both term sets, so long texts that merely contain the
/// query cannot crowd out a short exact match. Only those are scored by
/// edit distance.
pub fn fuzzy_search(
    index: &MemoryIndex,
    pair: &LangPair,
    query: &str,
    options: &FuzzyOptions,
) -> Vec<ScoredEntry> {
    let Some(inverted) = index.pair(pair) else {
        return Vec::new();
    };

    let scorer = SimilarityScorer::new(query);
    if scorer.is_empty() {
        return Vec::new();
    }

    let terms = index.analyzer().terms(query);
    let query_terms = terms.len() as u64;
    let mut candidates: Vec<Candidate> = inverted.shared_term_counts(&terms)
        .into_iter()
        .map(|(ord, shared)| {
            let shared = u64::from(shared);
            let doc_terms = u64::from(inverted.term_count(ord)).max(shared);
            Candidate { ord, shared, union: query_terms + doc_terms - shared }
        })
        .collect();
    candidates.sort_unstable_by(|a, b| b.cmp_overlap(a).then(a.ord.cmp(&b.ord)));
    candidates.truncate(options.max_candidates);

    let hits: Vec<ScoredEntry> = candidates.into_iter()
        .filter_map(|Candidate { ord, .. }| {
            let entry = index.document(ord)?;
            let normalized = normalize(&entry.source);
            if scorer.upper_bound(normalized.len()) < options.min_score {
                return None;
            }
            let score = scorer.score_normalized(&entry.source, &normalized);
            (score >= options.min_score).then(|| ScoredEntry {
                entry: entry.clone(),
                score,
            })
        })
        .collect();

    rank(hits, options.max_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::{Duration, Utc};
    use crate::analysis::analyzer::Analyzer;
    use crate::core::types::{Entry, Language};

    fn lang(tag: &str) -> Language {
        Language::parse(tag).unwrap()
    }

    fn index_with(entries: &[(&str, &str, &str, i64)]) -> MemoryIndex {
        let mut index = MemoryIndex::new(Arc::new(Analyzer::trigram()));
        for (target, source, translation, age) in entries {
            index.insert(Entry::new(
                lang("en"),
                lang(target),
                source.to_string(),
                translation.to_string(),
                Utc::now() - Duration::seconds(*age),
            )).unwrap();
        }
        index
    }

    #[test]
    fn exact_source_ranks_first() {
        let index = index_with(&[
            ("fr", "Hello world", "Bonjour le monde", 10),
            ("fr", "Hello worlds", "Bonjour les mondes", 0),
            ("fr", "Yellow word", "Mot jaune", 0),
        ]);
        let pair = LangPair::new(lang("en"), lang("fr"));

        let hits = fuzzy_search(&index, &pair, "Hello world", &FuzzyOptions::default());
        assert_eq!(hits[0].entry.translation, "Bonjour le monde");
        assert_eq!(hits[0].score, 1.0);
        assert!(hits.iter().skip(1).all(|h| h.score < 1.0));
    }

    #[test]
    fn other_language_pairs_are_invisible() {
        let index = index_with(&[("de", "Hello world", "Hallo Welt", 0)]);
        let pair = LangPair::new(lang("en"), lang("fr"));
        assert!(fuzzy_search(&index, &pair, "Hello world", &FuzzyOptions::default()).is_empty());
    }

    #[test]
    fn unrelated_text_gives_nothing() {
        let index = index_with(&[("fr", "Hello world", "Bonjour le monde", 0)]);
        let pair = LangPair::new(lang("en"), lang("fr"));
        assert!(fuzzy_search(&index, &pair, "Quantum chromodynamics", &FuzzyOptions::default()).is_empty());
        assert!(fuzzy_search(&index, &pair, "   ", &FuzzyOptions::default()).is_empty());
    }

    #[test]
    fn same_source_prefers_newer_translation() {
        let index = index_with(&[
            ("fr", "Save changes", "Enregistrer les modifications", 100),
            ("fr", "Save changes", "Sauvegarder les changements", 1),
        ]);
        let pair = LangPair::new(lang("en"), lang("fr"));

        let hits = fuzzy_search(&index, &pair, "Save changes", &FuzzyOptions::default());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.translation, "Sauvegarder les changements");
    }

    #[test]
    fn short_exact_match_survives_candidate_cap() {
        let sources: Vec<String> = (0..20).map(|i| format!("Save file number {}", i)).collect();
        let mut entries: Vec<(&str, &str, &str, i64)> = sources.iter()
            .map(|s| ("fr", s.as_str(), "Enregistrer le fichier", 0))
            .collect();
        // Inserted last, so it has the highest document number.
        entries.push(("fr", "Save", "Enregistrer", 0));
        let index = index_with(&entries);
        let pair = LangPair::new(lang("en"), lang("fr"));

        let options = FuzzyOptions { max_candidates: 5, ..FuzzyOptions::default() };
        let hits = fuzzy_search(&index, &pair, "Save", &options);
        assert_eq!(hits[0].entry.translation, "Enregistrer");
        assert_eq!(hits[0].score, 1.0);
    }
}
