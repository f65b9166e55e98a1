pub mod core;
pub mod storage;
pub mod analysis;
pub mod index;
pub mod scoring;
pub mod search;
pub mod mvcc;
pub mod writer;
pub mod compression;
pub mod suggestions;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::memory::TranslationMemory;
pub use crate::core::stats::TmStats;
pub use crate::core::types::{Entry, EntryId, LangPair, Language};
pub use crate::suggestions::backend::SuggestionsBackend;
pub use crate::suggestions::future::SuggestionFuture;
pub use crate::suggestions::types::{Provenance, Suggestion, SuggestionQuery, SuggestionsList};
pub use crate::writer::catalog::{Catalog, CatalogData, CatalogItem, CatalogUnit};
pub use crate::writer::entry_sink::EntrySink;
pub use crate::writer::transaction_writer::Writer;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                          TRANSMEM STRUCT ARCHITECTURE                         │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── FACADE ──────────────────────────────────────┐
│  struct TranslationMemory                                                     │
│  • store: Arc<IndexStore>          // committed state + commit path           │
│  • writer: OnceLock<Arc<Writer>>   // shared, created on first use            │
│  • search_pool: rayon::ThreadPool  // runs suggest_translation                │
│  Global: Uninitialized ─get()─▶ Active ─clean_up()─▶ ShutDown                 │
└───────────────────────────────────────────────────────────────────────────────┘
                 │ insert/delete                      │ search
                 ▼                                    ▼
┌──────────── WRITER ────────────┐   ┌──────────── READ PATH ─────────────────┐
│ pending: Mutex<Vec<TxOp>>      │   │ SnapshotController                      │
│ commit() ─▶ IndexStore::commit │   │  └─ Arc<Snapshot { version, index }>    │
│ rollback() drops the buffer    │   │ MemoryIndex                             │
│ Drop commits what is left      │   │  └─ per LangPair: InvertedIndex         │
└────────────────────────────────┘   │     (trigram -> RoaringBitmap)          │
                 │                   │ fuzzy: candidates -> Levenshtein -> rank │
                 ▼                   │ substring: trigram AND -> contains()    │
┌──────────────────────── STORAGE ───────────────────────────────────────────┐
│ segments/<uuid>.seg   [u32 len][bincode SegmentHeader][compressed payload] │
│ meta/checkpoint.bin   generation + live segment list (tmp + rename)        │
│ .lock                 exclusive flock while open                           │
│ commit: segment ─▶ checkpoint ─▶ publish snapshot ─▶ maybe merge           │
└─────────────────────────────────────────────────────────────────────────────┘
*/
