//! # Index Cache Module
//!
//! ## Purpose
//! Persistent key/value store for previously fetched search indexes, keyed by a
//! stable cache identifier, so repeat sessions skip redundant network fetches.
//!
//! ## Input/Output Specification
//! - **Input**: Fetched index entries keyed by source cache key
//! - **Output**: Cached entries on later lookups, or `None` on a miss
//! - **Storage**: Sled embedded database, bincode records, optional gzip
//!
//! ## Failure Policy
//! A storage failure must never block search: callers fall back to a direct
//! fetch and proceed without caching. Records are never invalidated; staleness
//! is accepted for the lifetime of the store.

use crate::config::CacheConfig;
use crate::errors::{Result, SearchError};
use crate::SearchEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted cache record for one source's index
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    fetched_at: DateTime<Utc>,
    entries: Vec<SearchEntry>,
}

/// Persistent cache of fetched search indexes
pub struct IndexCache {
    config: CacheConfig,
    tree: sled::Tree,
    // Kept alive for the tree's lifetime
    _db: sled::Db,
}

impl IndexCache {
    /// Open the cache store at the configured path
    pub fn open(config: CacheConfig) -> Result<Self> {
        let db = sled::open(&config.path).map_err(|e| SearchError::CacheOpen {
            path: config.path.to_string_lossy().to_string(),
            details: e.to_string(),
        })?;

        let tree = db.open_tree("indexes").map_err(|e| SearchError::CacheOpen {
            path: config.path.to_string_lossy().to_string(),
            details: format!("Failed to open indexes tree: {}", e),
        })?;

        tracing::debug!(
            "Index cache opened at {:?} with {} records",
            config.path,
            tree.len()
        );

        Ok(Self {
            config,
            tree,
            _db: db,
        })
    }

    /// Look up a previously cached index
    pub fn get(&self, key: &str) -> Result<Option<Vec<SearchEntry>>> {
        let Some(raw) = self.tree.get(key.as_bytes())? else {
            return Ok(None);
        };

        let bytes = if self.config.compress {
            decompress(&raw)?
        } else {
            raw.to_vec()
        };

        let record: CacheRecord = bincode::deserialize(&bytes)?;
        tracing::debug!(
            "Cache hit for '{}': {} entries fetched at {}",
            key,
            record.entries.len(),
            record.fetched_at
        );
        Ok(Some(record.entries))
    }

    /// Store a fetched index under its cache key
    pub fn put(&self, key: &str, entries: &[SearchEntry]) -> Result<()> {
        let record = CacheRecord {
            fetched_at: Utc::now(),
            entries: entries.to_vec(),
        };

        let bytes = bincode::serialize(&record)?;
        let payload = if self.config.compress {
            compress(&bytes)?
        } else {
            bytes
        };

        self.tree.insert(key.as_bytes(), payload)?;
        tracing::debug!("Cached '{}' ({} entries)", key, entries.len());
        Ok(())
    }

    /// Number of cached indexes
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

/// Gzip-compress a serialized record
fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| SearchError::CacheCodec {
            details: format!("Compression failed: {}", e),
        })?;

    encoder.finish().map_err(|e| SearchError::CacheCodec {
        details: format!("Compression finish failed: {}", e),
    })
}

/// Decompress a gzip record
fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SearchError::CacheCodec {
            details: format!("Decompression failed: {}", e),
        })?;

    Ok(decompressed)
}
