use serde::{Serialize, Deserialize};

/// Point-in-time figures over the committed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TmStats {
    pub document_count: usize,
    pub size_bytes: u64,
    pub segment_count: usize,
    pub version: u64,       // Snapshot version the counts were taken from
}

/// Outcome of one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitSummary {
    pub inserted: usize,
    pub deleted: usize,
    pub reset: bool,
    pub version: Option<u64>,   // None when nothing had to be written
}
