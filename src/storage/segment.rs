use chrono::{DateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::compression::compress::CompressionType;
use crate::core::types::{Entry, EntryId};

/// Unique segment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    pub fn new() -> Self {
        SegmentId(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        SegmentId::new()
    }
}

/// One committed batch on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub entry_count: u32,
    pub delete_count: u32,
    pub metadata: SegmentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentMetadata {
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Net effect of a batch. Replay applies `deletes` before `entries`, so an
/// id can appear in both when an entry was replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentData {
    pub deletes: Vec<EntryId>,
    pub entries: Vec<Entry>,
}

impl SegmentData {
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.entries.is_empty()
    }
}

/// Segment file header, stored length-prefixed ahead of the payload.
// [ u32 header length ][ HEADER ][ PAYLOAD (compressed SegmentData) ]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentHeader {
    pub magic: u32,
    pub version: u32,     // Format version
    pub compression: CompressionType,
    pub checksum: u32,    // CRC32 of the payload as stored
    pub raw_size: u64,    // Payload size before compression
    pub entry_count: u32,
    pub delete_count: u32,
}

impl SegmentHeader {
    pub const MAGIC: u32 = 0x544d_5347; // "TMSG"
    pub const VERSION: u32 = 1;
    pub const MAX_SIZE: usize = 256;
}
