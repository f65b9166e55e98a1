use std::fs;
use crc32fast::Hasher;
use crate::compression::compress::CompressedBlock;
use crate::core::error::{Error, Result};
use crate::storage::layout::StorageLayout;
use crate::storage::segment::{SegmentData, SegmentHeader, SegmentId};

pub struct SegmentReader {
    pub segment_id: SegmentId,
    pub header: SegmentHeader,
    payload: Vec<u8>,
}

impl SegmentReader {
    /// Read a segment file and validate its header and checksum.
    pub fn open(storage: &StorageLayout, segment_id: SegmentId) -> Result<Self> {
        let bytes = fs::read(storage.segment_path(&segment_id))?;
        let corrupt = |what: &str| Error::corruption(format!("Segment {}: {}", segment_id.0, what));

        if bytes.len() < 4 {
            return Err(corrupt("truncated header"));
        }
        let header_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if header_len > SegmentHeader::MAX_SIZE || bytes.len() < 4 + header_len {
            return Err(corrupt("bad header length"));
        }

        let header: SegmentHeader = bincode::deserialize(&bytes[4..4 + header_len])
            .map_err(|_| corrupt("unreadable header"))?;

        if header.magic != SegmentHeader::MAGIC {
            return Err(corrupt("not a segment file"));
        }
        if header.version != SegmentHeader::VERSION {
            return Err(corrupt("incompatible segment version"));
        }

        let payload = bytes[4 + header_len..].to_vec();
        let mut hasher = Hasher::new();
        hasher.update(&payload);
        if hasher.finalize() != header.checksum {
            return Err(corrupt("checksum mismatch"));
        }

        Ok(SegmentReader {
            segment_id,
            header,
            payload,
        })
    }

    pub fn read_data(self) -> Result<SegmentData> {
        let block = CompressedBlock {
            data: self.payload,
            original_size: self.header.raw_size as usize,
            compression: self.header.compression,
        };
        let raw = block.decompress()?;
        let data: SegmentData = bincode::deserialize(&raw)
            .map_err(|e| Error::corruption(format!("Segment {}: {}", self.segment_id.0, e)))?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::compression::compress::CompressionType;
    use crate::core::error::ErrorKind;
    use crate::core::types::{Entry, EntryId, Language};
    use crate::storage::segment_writer::SegmentWriter;

    fn entry(source: &str, translation: &str) -> Entry {
        Entry::new(
            Language::parse("en").unwrap(),
            Language::parse("de").unwrap(),
            source.to_string(),
            translation.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn reads_back_written_batch() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let removed = EntryId::new();
        let mut writer = SegmentWriter::new(SegmentId::new(), CompressionType::Zstd);
        writer.add_delete(removed);
        writer.add_entry(entry("Save", "Speichern"));
        writer.add_entry(entry("Grüße", "Greetings"));
        let segment = writer.finish(&storage, false).unwrap();
        assert_eq!(segment.entry_count, 2);
        assert_eq!(segment.delete_count, 1);

        let data = SegmentReader::open(&storage, segment.id).unwrap().read_data().unwrap();
        assert_eq!(data.deletes, vec![removed]);
        assert_eq!(data.entries[1].source, "Grüße");
    }

    #[test]
    fn flipped_byte_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut writer = SegmentWriter::new(SegmentId::new(), CompressionType::Lz4);
        writer.add_entry(entry("Open file", "Datei öffnen"));
        let segment = writer.finish(&storage, false).unwrap();

        let path = storage.segment_path(&segment.id);
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let err = SegmentReader::open(&storage, segment.id).err().unwrap();
        assert_eq!(err.kind, ErrorKind::Corruption);
    }
}
