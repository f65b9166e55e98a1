use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::core::types::{EntryId, Language};
use crate::search::results::ScoredEntry;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    TranslationMemory,
}

/// Candidate translation offered to the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,           // Suggested translation
    pub source: String,         // Source text it translates
    pub score: f64,             // Confidence, 0.0..=1.0
    pub id: EntryId,
    pub created_at: DateTime<Utc>,
    pub provenance: Provenance,
}

impl From<&ScoredEntry> for Suggestion {
    fn from(hit: &ScoredEntry) -> Self {
        Suggestion {
            text: hit.entry.translation.clone(),
            source: hit.entry.source.clone(),
            score: hit.score.clamp(0.0, 1.0),
            id: hit.entry.id,
            created_at: hit.entry.created_at,
            provenance: Provenance::TranslationMemory,
        }
    }
}

pub type SuggestionsList = Vec<Suggestion>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub source_lang: Language,
    pub target_lang: Language,
    pub source: String,
    pub context: Option<String>,    // msgctxt or similar; unused by the memory
}

impl SuggestionQuery {
    pub fn new(source_lang: Language, target_lang: Language, source: &str) -> Self {
        SuggestionQuery {
            source_lang,
            target_lang,
            source: source.to_string(),
            context: None,
        }
    }
}
