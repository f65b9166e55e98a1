use std::collections::{BTreeSet, HashMap};
use roaring::RoaringBitmap;

/// Process-local document number; reassigned every time the store is opened.
pub type DocOrd = u32;

/// Term -> documents postings for the source texts of one language pair
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    pub docs: RoaringBitmap,
    pub postings: HashMap<String, RoaringBitmap>,
    /// Distinct terms per document
    pub term_counts: HashMap<DocOrd, u32>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    pub fn add_document(&mut self, ord: DocOrd, terms: &BTreeSet<String>) {
        self.docs.insert(ord);
        self.term_counts.insert(ord, terms.len() as u32);
        for term in terms {
            self.postings.entry(term.clone())
                .or_default()
                .insert(ord);
        }
    }

    pub fn remove_document(&mut self, ord: DocOrd, terms: &BTreeSet<String>) {
        self.docs.remove(ord);
        self.term_counts.remove(&ord);
        for term in terms {
            if let Some(bitmap) = self.postings.get_mut(term) {
                bitmap.remove(ord);
                if bitmap.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
    }

    pub fn doc_count(&self) -> u64 {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of query terms each document shares with `terms`.
    pub fn shared_term_counts(&self, terms: &BTreeSet<String>) -> HashMap<DocOrd, u32> {
        let mut counts: HashMap<DocOrd, u32> = HashMap::new();
        for term in terms {
            if let Some(bitmap) = self.postings.get(term) {
                for ord in bitmap {
                    *counts.entry(ord).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    pub fn term_count(&self, ord: DocOrd) -> u32 {
        self.term_counts.get(&ord).copied().unwrap_or(0)
    }

    /// Documents containing every term; all documents when `terms` is empty.
    pub fn documents_with_all(&self, terms: &BTreeSet<String>) -> RoaringBitmap {
        let mut result = self.docs.clone();
        for term in terms {
            match self.postings.get(term) {
                Some(bitmap) => result &= bitmap,
                None => return RoaringBitmap::new(),
            }
            if result.is_empty() {
                break;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_shared_terms() {
        let mut index = InvertedIndex::new();
        index.add_document(1, &terms(&["ope", "pen", "fil"]));
        index.add_document(2, &terms(&["clo", "fil"]));

        let counts = index.shared_term_counts(&terms(&["ope", "fil"]));
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
    }

    #[test]
    fn intersection_requires_every_term() {
        let mut index = InvertedIndex::new();
        index.add_document(1, &terms(&["ope", "pen"]));
        index.add_document(2, &terms(&["ope"]));

        let both = index.documents_with_all(&terms(&["ope", "pen"]));
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![1]);
        assert!(index.documents_with_all(&terms(&["zzz"])).is_empty());
        assert_eq!(index.documents_with_all(&BTreeSet::new()).len(), 2);
    }

    #[test]
    fn removal_drops_empty_postings() {
        let mut index = InvertedIndex::new();
        let t = terms(&["abc"]);
        index.add_document(4, &t);
        index.remove_document(4, &t);
        assert!(index.is_empty());
        assert!(index.postings.is_empty());
        assert!(index.term_counts.is_empty());
    }

    #[test]
    fn tracks_distinct_terms_per_document() {
        let mut index = InvertedIndex::new();
        index.add_document(1, &terms(&["sav", "ave"]));
        index.add_document(2, &terms(&["sav", "ave", "ve ", "fil"]));

        assert_eq!(index.term_count(1), 2);
        assert_eq!(index.term_count(2), 4);
        assert_eq!(index.term_count(9), 0);

        index.remove_document(2, &terms(&["sav", "ave", "ve ", "fil"]));
        assert_eq!(index.term_count(2), 0);
        assert_eq!(index.term_count(1), 2);
    }
}
