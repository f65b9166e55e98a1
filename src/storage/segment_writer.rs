use std::io::Write;
use std::fs::{self, File};
use chrono::Utc;
use crc32fast::Hasher;
use crate::compression::compress::{CompressedBlock, CompressionType};
use crate::core::types::{Entry, EntryId};
use crate::storage::layout::StorageLayout;
use crate::storage::segment::{Segment, SegmentData, SegmentHeader, SegmentId, SegmentMetadata};
use crate::core::error::Result;

/// Accumulates one batch and writes it as a single segment file.
pub struct SegmentWriter {
    pub id: SegmentId,
    pub data: SegmentData,
    pub compression: CompressionType,
}

impl SegmentWriter {
    pub fn new(id: SegmentId, compression: CompressionType) -> Self {
        SegmentWriter {
            id,
            data: SegmentData::default(),
            compression,
        }
    }

    pub fn add_delete(&mut self, id: EntryId) {
        self.data.deletes.push(id);
    }

    pub fn add_entry(&mut self, entry: Entry) {
        self.data.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the file and optionally fsync it along with its directory
    /// entry. A failed write leaves no file behind.
    pub fn finish(self, storage: &StorageLayout, sync: bool) -> Result<Segment> {
        let path = storage.segment_path(&self.id);
        let result = self.write_file(storage, sync).and_then(|segment| {
            if sync {
                StorageLayout::sync_dir(&storage.segments_dir)?;
            }
            Ok(segment)
        });
        if result.is_err() {
            let _ = fs::remove_file(&path);
        }
        result
    }

    fn write_file(&self, storage: &StorageLayout, sync: bool) -> Result<Segment> {
        let raw = bincode::serialize(&self.data)?;
        let block = CompressedBlock::compress(&raw, self.compression)?;

        let mut hasher = Hasher::new();
        hasher.update(&block.data);

        let header = SegmentHeader {
            magic: SegmentHeader::MAGIC,
            version: SegmentHeader::VERSION,
            compression: self.compression,
            checksum: hasher.finalize(),
            raw_size: block.original_size as u64,
            entry_count: self.data.entries.len() as u32,
            delete_count: self.data.deletes.len() as u32,
        };
        let header_data = bincode::serialize(&header)?;

        let mut file = File::create(storage.segment_path(&self.id))?;
        file.write_all(&(header_data.len() as u32).to_le_bytes())?;
        file.write_all(&header_data)?;
        file.write_all(&block.data)?;
        if sync {
            file.sync_all()?;
        }

        Ok(Segment {
            id: self.id,
            entry_count: header.entry_count,
            delete_count: header.delete_count,
            metadata: SegmentMetadata {
                created_at: Utc::now(),
                size_bytes: file.metadata()?.len(),
            },
        })
    }
}
