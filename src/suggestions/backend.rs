use crate::core::error::Result;
use crate::core::types::EntryId;
use crate::suggestions::future::SuggestionFuture;
use crate::suggestions::types::SuggestionQuery;

/// Source of translation suggestions the editor can poll alongside others
pub trait SuggestionsBackend: Send + Sync {
    /// Start a search; never blocks the caller. Errors travel inside the
    /// returned future.
    fn suggest_translation(&self, query: SuggestionQuery) -> SuggestionFuture;

    /// Forget a suggestion previously returned by this backend.
    fn delete(&self, id: EntryId) -> Result<()>;
}
