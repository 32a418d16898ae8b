//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the documentation search engine, providing
//! error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from fetching, caching, configuration, and hosting
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Fetch, Storage, Config, Internal
//!
//! ## Recovery Policy
//! - Storage errors are always recovered locally: the caller falls back to a
//!   direct fetch and proceeds without caching.
//! - Fetch errors for an external library source are recovered locally: that
//!   source contributes zero results while the others proceed.
//! - A fetch error for the primary index surfaces as a visible "search
//!   unavailable" host state rather than silently empty results.
//! - Config errors at widget construction are fatal for that widget instance
//!   only.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the documentation search engine
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level failure while fetching an index
    #[error("Failed to fetch index for '{source_name}': {details}")]
    Fetch { source_name: String, details: String },

    /// Index endpoint answered with a non-success status
    #[error("Index fetch for '{source_name}' returned HTTP {status}")]
    HttpStatus { source_name: String, status: u16 },

    /// Index body was not valid search-index JSON
    #[error("Failed to parse index from '{source_name}': {details}")]
    IndexParse { source_name: String, details: String },

    /// Cache store could not be opened
    #[error("Failed to open index cache at {path}: {details}")]
    CacheOpen { path: String, details: String },

    /// Cache read/write failure
    #[error("Index cache error: {details}")]
    Storage { details: String },

    /// Cached record could not be encoded or decoded
    #[error("Cache codec error: {details}")]
    CacheCodec { details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration value failed validation
    #[error("Validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// The host is missing a required capability or element
    #[error("Host is missing required capability: {capability}")]
    HostMissing { capability: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SearchError {
    /// Check if the error is recovered locally rather than surfaced
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SearchError::Fetch { .. }
                | SearchError::HttpStatus { .. }
                | SearchError::Storage { .. }
                | SearchError::CacheOpen { .. }
                | SearchError::CacheCodec { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::Fetch { .. }
            | SearchError::HttpStatus { .. }
            | SearchError::IndexParse { .. } => "fetch",
            SearchError::CacheOpen { .. }
            | SearchError::Storage { .. }
            | SearchError::CacheCodec { .. } => "storage",
            SearchError::Config { .. }
            | SearchError::Validation { .. }
            | SearchError::HostMissing { .. } => "config",
            SearchError::Internal { .. } => "internal",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::IndexParse {
            source_name: "unknown".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Fetch {
            source_name: err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            details: err.to_string(),
        }
    }
}

impl From<sled::Error> for SearchError {
    fn from(err: sled::Error) -> Self {
        SearchError::Storage {
            details: err.to_string(),
        }
    }
}

impl From<bincode::Error> for SearchError {
    fn from(err: bincode::Error) -> Self {
        SearchError::CacheCodec {
            details: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let fetch = SearchError::HttpStatus {
            source_name: "pyvista".to_string(),
            status: 404,
        };
        assert_eq!(fetch.category(), "fetch");
        assert!(fetch.is_recoverable());

        let storage = SearchError::Storage {
            details: "quota exceeded".to_string(),
        };
        assert_eq!(storage.category(), "storage");
        assert!(storage.is_recoverable());

        let config = SearchError::Validation {
            field: "search.threshold".to_string(),
            reason: "out of range".to_string(),
        };
        assert_eq!(config.category(), "config");
        assert!(!config.is_recoverable());
    }
}
