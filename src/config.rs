//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the documentation search engine,
//! supporting TOML files and environment variable overrides with validation and
//! type-safe access to all settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use docsite_search::config::Config;
//!
//! let config = Config::from_file("search.toml").unwrap();
//! println!("Debounce: {}ms", config.search.debounce_ms);
//! ```

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all widget settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search behavior
    pub search: SearchConfig,
    /// Index sources (primary site and external libraries)
    pub sources: SourcesConfig,
    /// Snippet and highlighting behavior
    pub snippet: SnippetConfig,
    /// Local index cache
    pub cache: CacheConfig,
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search fires (ms)
    pub debounce_ms: u64,
    /// Maximum number of results per source
    pub result_limit: usize,
    /// Cap on the merged result sequence across all sources
    pub combined_limit: Option<usize>,
    /// Minimum query length before searching
    pub min_query_length: usize,
    /// Normalized similarity cutoff in (0, 1]; weaker matches are dropped
    pub threshold: f32,
    /// Per-field match weights
    pub weights: FieldWeights,
}

/// Relative weights of entry fields during scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f32,
    pub text: f32,
    pub object_id: f32,
    pub section: f32,
}

/// Index source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// URL of the primary site's search index
    pub primary_index_url: String,
    /// Base path used to resolve primary entry hrefs from any nested page
    pub content_root: String,
    /// External library name -> base URL
    pub libraries: BTreeMap<String, String>,
    /// Path of the index file under each library's base URL
    pub library_index_path: String,
}

/// Snippet and highlight configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Characters of context kept before and after the first match
    pub window: usize,
    /// Maximum preview length when no query term occurs in the text
    pub preview_max: usize,
}

/// Index cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the persistent index cache
    pub enabled: bool,
    /// Cache store path
    pub path: PathBuf,
    /// Gzip-compress cached indexes
    pub compress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            result_limit: 10,
            combined_limit: None,
            min_query_length: 2,
            threshold: 0.3,
            weights: FieldWeights::default(),
        }
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 1.0,
            text: 1.0,
            object_id: 0.5,
            section: 0.5,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary_index_url: "/_static/search.json".to_string(),
            content_root: String::new(),
            libraries: BTreeMap::new(),
            library_index_path: "_static/search.json".to_string(),
        }
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            window: 100,
            preview_max: 200,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("./data/search-cache"),
            compress: true,
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| SearchError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).map_err(|e| SearchError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Debounce delay as a [`Duration`]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("DOCSITE_SEARCH_INDEX_URL") {
            self.sources.primary_index_url = url;
        }
        if let Ok(root) = std::env::var("DOCSITE_SEARCH_CONTENT_ROOT") {
            self.sources.content_root = root;
        }
        if let Ok(path) = std::env::var("DOCSITE_SEARCH_CACHE_PATH") {
            self.cache.path = PathBuf::from(path);
        }
        if let Ok(delay) = std::env::var("DOCSITE_SEARCH_DEBOUNCE_MS") {
            self.search.debounce_ms = delay.parse().map_err(|_| SearchError::Config {
                message: "Invalid delay in DOCSITE_SEARCH_DEBOUNCE_MS".to_string(),
            })?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sources.primary_index_url.is_empty() {
            return Err(SearchError::Validation {
                field: "sources.primary_index_url".to_string(),
                reason: "Primary index URL cannot be empty".to_string(),
            });
        }

        if self.search.result_limit == 0 {
            return Err(SearchError::Validation {
                field: "search.result_limit".to_string(),
                reason: "Result limit must be greater than zero".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(SearchError::Validation {
                field: "search.threshold".to_string(),
                reason: "Threshold must be within [0, 1]".to_string(),
            });
        }

        if self.snippet.window == 0 {
            return Err(SearchError::Validation {
                field: "snippet.window".to_string(),
                reason: "Snippet window must be greater than zero".to_string(),
            });
        }

        for (name, base_url) in &self.sources.libraries {
            if name.is_empty() || base_url.is_empty() {
                return Err(SearchError::Validation {
                    field: "sources.libraries".to_string(),
                    reason: format!("Library entry '{}' has an empty name or URL", name),
                });
            }
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SearchError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.result_limit, 10);
        assert_eq!(config.search.min_query_length, 2);
        assert!((config.search.threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.snippet.window, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::from_toml(
            r#"
            [search]
            debounce_ms = 150
            result_limit = 5

            [sources]
            primary_index_url = "https://docs.example.com/_static/search.json"

            [sources.libraries]
            pyvista = "https://docs.pyvista.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(
            config.sources.libraries.get("pyvista").map(String::as_str),
            Some("https://docs.pyvista.org")
        );
        // Unset sections fall back to defaults
        assert_eq!(config.snippet.preview_max, 200);
    }

    #[test]
    fn test_validation_rejects_bad_threshold() {
        let mut config = Config::default();
        config.search.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(SearchError::Validation { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_limit() {
        let mut config = Config::default();
        config.search.result_limit = 0;
        assert!(config.validate().is_err());
    }
}
