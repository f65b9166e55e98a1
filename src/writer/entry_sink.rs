use chrono::{DateTime, Utc};
use crate::core::error::Result;
use crate::core::types::Language;

/// Anything that accepts translation entries one at a time.
///
/// Export pushes into it, import producers write through it, and substring
/// search streams its matches into it.
pub trait EntrySink {
    fn insert_entry(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        source: &str,
        translation: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()>;
}

impl<F> EntrySink for F
where
    F: Fn(&Language, &Language, &str, &str, DateTime<Utc>) -> Result<()>,
{
    fn insert_entry(
        &self,
        source_lang: &Language,
        target_lang: &Language,
        source: &str,
        translation: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self(source_lang, target_lang, source, translation, created_at)
    }
}
