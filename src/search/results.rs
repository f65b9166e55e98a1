use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use crate::core::types::Entry;

/// Entry with similarity score
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: Arc<Entry>,
    pub score: f64,
}

impl ScoredEntry {
    /// Higher score first, then newer, then id for a stable order.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.score.partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.entry.created_at.cmp(&self.entry.created_at))
            .then_with(|| self.entry.id.cmp(&other.entry.id))
    }
}

/// Collapse duplicate (source, translation) pairs to their newest entry,
/// sort by rank and keep at most `limit` hits.
pub fn rank(hits: Vec<ScoredEntry>, limit: usize) -> Vec<ScoredEntry> {
    let mut newest: HashMap<(&str, &str), usize> = HashMap::new();
    for (i, hit) in hits.iter().enumerate() {
        let key = (hit.entry.source.as_str(), hit.entry.translation.as_str());
        match newest.get(&key) {
            Some(&j) if hits[j].entry.created_at >= hit.entry.created_at => {}
            _ => {
                newest.insert(key, i);
            }
        }
    }

    let mut keep: Vec<usize> = newest.into_values().collect();
    keep.sort_unstable();

    let mut ranked: Vec<ScoredEntry> = keep.into_iter().map(|i| hits[i].clone()).collect();
    ranked.sort_by(|a, b| a.rank_cmp(b));
    ranked.truncate(limit);
    ranked
}
