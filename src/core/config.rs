use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::compression::compress::CompressionType;
use crate::core::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_path: PathBuf,

    // Fuzzy search
    pub max_results: usize,       // Hits returned per query
    pub min_score: f64,           // Similarity floor, 0.0..=1.0
    pub max_candidates: usize,    // Candidates scored per query

    // Storage
    pub compression: CompressionType,
    pub max_segments: usize,      // Merge once the checkpoint lists more
    pub sync_writes: bool,        // fsync segments and checkpoints

    pub search_threads: usize,
    pub default_source_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./tm_data"),
            max_results: 10,
            min_score: 0.5,
            max_candidates: 200,
            compression: CompressionType::Lz4,
            max_segments: 10,
            sync_writes: true,
            search_threads: num_cpus::get().clamp(1, 4),
            default_source_language: "en".to_string(),
        }
    }
}

impl Config {
    pub fn with_storage_path<P: Into<PathBuf>>(path: P) -> Self {
        Config {
            storage_path: path.into(),
            ..Config::default()
        }
    }

    /// Load from a JSON file; missing keys take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let config: Config = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("min_score must be within 0..=1, got {}", self.min_score),
            ));
        }
        if self.max_results == 0 || self.max_candidates == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "max_results and max_candidates must be positive".to_string(),
            ));
        }
        if self.max_segments < 2 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("max_segments must be at least 2, got {}", self.max_segments),
            ));
        }
        if self.search_threads == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "search_threads must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
