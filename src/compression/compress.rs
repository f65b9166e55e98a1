use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

/// Codec applied to a segment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    Lz4,      // Fast, default for commits
    Zstd,     // Better ratio, slower
    Snappy,
}

/// Compressed byte block; `original_size` is kept to size the output buffer
/// and to detect truncated payloads.
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
    pub compression: CompressionType,
}

impl CompressedBlock {
    pub fn compress(data: &[u8], compression: CompressionType) -> Result<Self> {
        let compressed = match compression {
            CompressionType::None => data.to_vec(),

            CompressionType::Lz4 => lz4_flex::block::compress(data),

            CompressionType::Zstd => {
                zstd::encode_all(data, 3)?  // Level 3 is balanced
            }

            CompressionType::Snappy => {
                let mut encoder = snap::raw::Encoder::new();
                encoder.compress_vec(data)
                    .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?
            }
        };

        Ok(CompressedBlock {
            data: compressed,
            original_size: data.len(),
            compression,
        })
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        let raw = match self.compression {
            CompressionType::None => self.data.clone(),

            CompressionType::Lz4 => {
                lz4_flex::block::decompress(&self.data, self.original_size)
                    .map_err(|e| Error::corruption(format!("LZ4 payload: {}", e)))?
            }

            CompressionType::Zstd => {
                zstd::decode_all(&self.data[..])
                    .map_err(|e| Error::corruption(format!("Zstd payload: {}", e)))?
            }

            CompressionType::Snappy => {
                let mut decoder = snap::raw::Decoder::new();
                decoder.decompress_vec(&self.data)
                    .map_err(|e| Error::corruption(format!("Snappy payload: {}", e)))?
            }
        };

        if raw.len() != self.original_size {
            return Err(Error::corruption(format!(
                "Payload size mismatch: expected {} bytes, got {}",
                self.original_size,
                raw.len()
            )));
        }

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_codec_restores_input() {
        let text = "Bonjour le monde, Grüß Gott, こんにちは ".repeat(50);
        for codec in [CompressionType::None, CompressionType::Lz4, CompressionType::Zstd, CompressionType::Snappy] {
            let block = CompressedBlock::compress(text.as_bytes(), codec).unwrap();
            assert_eq!(block.decompress().unwrap(), text.as_bytes());
        }
    }

    #[test]
    fn size_mismatch_is_corruption() {
        let mut block = CompressedBlock::compress(b"abc", CompressionType::None).unwrap();
        block.original_size = 10;
        assert_eq!(block.decompress().unwrap_err().kind, ErrorKind::Corruption);
    }
}
