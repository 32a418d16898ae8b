//! # Index Loader Module
//!
//! ## Purpose
//! Fetches JSON search indexes for the primary site and any configured external
//! libraries, consulting the persistent index cache before going to the network.
//!
//! ## Input/Output Specification
//! - **Input**: Source descriptors (primary index URL, library base URLs)
//! - **Output**: Loaded [`SearchIndex`] values ready for the engine
//! - **Formats**: JSON array of `{title, text, href, objectID?, section?}`
//!
//! ## Failure Policy
//! External sources load independently: a failed library fetch is logged and
//! that source is treated as empty, never blocking the others. Cache failures
//! degrade to a direct fetch. Callers decide how to surface a primary failure.
//!
//! ## Architecture
//! - `IndexSource` trait: common interface for all index sources
//! - `PrimarySource`: the documentation site's own index
//! - `LibrarySource`: one external library index
//! - `IndexLoader`: cache-first loading and fan-out across sources

use crate::cache::IndexCache;
use crate::config::{CacheConfig, SourcesConfig};
use crate::errors::{Result, SearchError};
use crate::utils::TextUtils;
use crate::{SearchEntry, SearchIndex, SourceId};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Trait for search index sources
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Identifier of this source
    fn id(&self) -> SourceId;

    /// Key under which this source's index is cached
    fn cache_key(&self) -> String {
        self.id().cache_key()
    }

    /// URL of the index document
    fn index_url(&self) -> String;

    /// Base URL used to resolve entry hrefs from this source
    fn base_url(&self) -> &str;

    /// Fetch and parse the index over HTTP
    async fn fetch(&self, client: &Client) -> Result<Vec<SearchEntry>> {
        let url = self.index_url();
        debug!("Fetching index for '{}' from {}", self.id(), url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Fetch {
                source_name: self.id().to_string(),
                details: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SearchError::HttpStatus {
                source_name: self.id().to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SearchError::Fetch {
            source_name: self.id().to_string(),
            details: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| SearchError::IndexParse {
            source_name: self.id().to_string(),
            details: e.to_string(),
        })
    }
}

/// The documentation site's own index
pub struct PrimarySource {
    index_url: String,
    content_root: String,
}

impl PrimarySource {
    pub fn new(index_url: impl Into<String>, content_root: impl Into<String>) -> Self {
        Self {
            index_url: index_url.into(),
            content_root: content_root.into(),
        }
    }
}

#[async_trait]
impl IndexSource for PrimarySource {
    fn id(&self) -> SourceId {
        SourceId::Primary
    }

    fn index_url(&self) -> String {
        self.index_url.clone()
    }

    fn base_url(&self) -> &str {
        &self.content_root
    }
}

/// One external library index
pub struct LibrarySource {
    name: String,
    base_url: String,
    index_path: String,
}

impl LibrarySource {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        index_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            index_path: index_path.into(),
        }
    }
}

#[async_trait]
impl IndexSource for LibrarySource {
    fn id(&self) -> SourceId {
        SourceId::Library(self.name.clone())
    }

    fn index_url(&self) -> String {
        TextUtils::join_url(&self.base_url, &self.index_path)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Build the configured source list: the primary site first, then libraries in
/// configuration order.
pub fn configured_sources(config: &SourcesConfig) -> Vec<Box<dyn IndexSource>> {
    let mut sources: Vec<Box<dyn IndexSource>> = vec![Box::new(PrimarySource::new(
        config.primary_index_url.clone(),
        config.content_root.clone(),
    ))];

    for (name, base_url) in &config.libraries {
        sources.push(Box::new(LibrarySource::new(
            name.clone(),
            base_url.clone(),
            config.library_index_path.clone(),
        )));
    }

    sources
}

/// Cache-first index loader
pub struct IndexLoader {
    client: Client,
    cache: Option<IndexCache>,
}

impl IndexLoader {
    /// Create a loader, opening the index cache when enabled. A cache that
    /// fails to open is logged and skipped; loading proceeds uncached.
    pub fn new(cache_config: CacheConfig) -> Self {
        let cache = if cache_config.enabled {
            match IndexCache::open(cache_config) {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("Index cache unavailable, loading uncached: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            client: Client::new(),
            cache,
        }
    }

    /// Load one source's index, consulting the cache first
    pub async fn load(&self, source: &dyn IndexSource) -> Result<SearchIndex> {
        let key = source.cache_key();

        if let Some(cache) = &self.cache {
            match cache.get(&key) {
                Ok(Some(entries)) => {
                    return Ok(SearchIndex {
                        source: source.id(),
                        base_url: source.base_url().to_string(),
                        entries,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!("Cache read failed for '{}': {}", key, e),
            }
        }

        let entries = source.fetch(&self.client).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &entries) {
                warn!("Cache write failed for '{}': {}", key, e);
            }
        }

        debug!("Loaded {} entries for '{}'", entries.len(), source.id());
        Ok(SearchIndex {
            source: source.id(),
            base_url: source.base_url().to_string(),
            entries,
        })
    }

    /// Load every source concurrently. Each source is an independent failure
    /// domain: the result preserves source order and carries per-source errors.
    pub async fn load_all(
        &self,
        sources: &[Box<dyn IndexSource>],
    ) -> Vec<(SourceId, Result<SearchIndex>)> {
        let futures = sources.iter().map(|source| async move {
            let outcome = self.load(source.as_ref()).await;
            if let Err(e) = &outcome {
                warn!(
                    "Failed to load index for '{}' ({}): {}",
                    source.id(),
                    e.category(),
                    e
                );
            }
            (source.id(), outcome)
        });

        futures::future::join_all(futures).await
    }
}
