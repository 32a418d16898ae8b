//! # Incremental Documentation Search Engine
//!
//! ## Overview
//! This library implements an embeddable, host-agnostic search engine for static
//! documentation sites. It loads one or more JSON search indexes (the primary site
//! index plus any number of external library indexes), caches them locally, and
//! answers debounced free-text queries with highlighted, snippeted, keyboard-navigable
//! results.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `loader`: Index fetching over HTTP with cache-first lookup and fan-out loading
//! - `cache`: Persistent key/value store for fetched indexes
//! - `engine`: Fuzzy search across the primary and active external indexes
//! - `filters`: Facet state (document-object and library filters)
//! - `presenter`: Highlighting and snippet windowing of raw results
//! - `controller`: Explicit UI state machine with debounce and stale-result discard
//! - `widget`: Per-widget instance wiring engine, filters, controller, and host
//! - `host`: Capability interface the hosting UI implements
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Search index JSON (title/text/href records), user input events
//! - **Output**: Ranked, highlighted result records delivered to the host UI
//! - **Ordering**: UI state always reflects the most recently issued query
//!
//! ## Usage
//! ```rust,no_run
//! use docsite_search::{Config, SearchWidget, WidgetEvent, host::MemoryHost};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("search.toml")?;
//!     let host = MemoryHost::new();
//!     let widget = SearchWidget::new(config, host).await?;
//!     let events = widget.event_sender();
//!     tokio::spawn(widget.run());
//!     events.send(WidgetEvent::Keystroke("install".to_string()))?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod cache;
pub mod config;
pub mod controller;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod host;
pub mod loader;
pub mod presenter;
pub mod text;
pub mod widget;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use engine::{QueryResult, SearchEngine, SearchOptions};
pub use errors::{Result, SearchError};
pub use presenter::DisplayRecord;
pub use widget::{SearchWidget, WidgetEvent};

use serde::{Deserialize, Serialize};

/// Identifier of the index an entry came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// The documentation site's own index
    Primary,
    /// An external library index, by configured name
    Library(String),
}

impl SourceId {
    /// Label shown next to results from external sources
    pub fn label(&self) -> Option<&str> {
        match self {
            SourceId::Primary => None,
            SourceId::Library(name) => Some(name),
        }
    }

    /// Cache key under which this source's index is persisted
    pub fn cache_key(&self) -> String {
        match self {
            SourceId::Primary => "main-search-index".to_string(),
            SourceId::Library(name) => format!("lib-search-{}", name),
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::Primary => write!(f, "primary"),
            SourceId::Library(name) => write!(f, "{}", name),
        }
    }
}

/// One indexed documentation unit (page, section, or API symbol).
///
/// Duplicate `href`s may legitimately appear: the same anchor can be indexed
/// under multiple terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// Display title of the unit
    pub title: String,
    /// Full searchable text
    pub text: String,
    /// Link target, relative to the owning site's root
    pub href: String,
    /// Owning document identifier, used by the document facet
    #[serde(default, alias = "objectID")]
    pub object_id: Option<String>,
    /// Section breadcrumb within the document
    #[serde(default)]
    pub section: Option<String>,
}

/// A loaded search index: entries plus where they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Which source produced this index
    pub source: SourceId,
    /// Base URL used to resolve entry `href`s
    pub base_url: String,
    /// Entries in index order
    pub entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
