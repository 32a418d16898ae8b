//! # Search Engine Module
//!
//! ## Purpose
//! Fuzzy search across the primary index and any active external library
//! indexes, producing one merged, deterministically ranked result sequence.
//!
//! ## Input/Output Specification
//! - **Input**: Search queries (text), search options, loaded indexes
//! - **Output**: Ranked [`QueryResult`]s with resolved link targets
//! - **Ranking**: Delegated to the fuzzy-match capability with fixed field
//!   weights and a normalized similarity threshold
//!
//! ## Key Properties
//! - Each result keeps its relative rank within its own index; cross-index
//!   ordering is by descending combined score with a deterministic tie-break
//!   (source order, then within-index rank)
//! - The object/document facet applies as a post-filter only when non-empty
//! - Results truncate to the limit per source before merging, and the merged
//!   sequence caps at the combined limit when one is configured
//! - An empty query yields an empty result sequence, never "all documents"

use crate::config::{FieldWeights, SearchConfig};
use crate::text::fold;
use crate::utils::TextUtils;
use crate::{SearchEntry, SearchIndex, SourceId};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashSet;

/// Per-query search parameters
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum results per source
    pub limit: usize,
    /// Cap on the merged sequence across sources
    pub combined_limit: Option<usize>,
    /// Sources participating in this search; `None` means all loaded sources
    pub active_sources: Option<Vec<SourceId>>,
    /// Selected document identifiers; empty means no document filtering
    pub object_filter: HashSet<String>,
}

impl SearchOptions {
    /// Options searching every loaded source with the given per-source limit
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            combined_limit: None,
            active_sources: None,
            object_filter: HashSet::new(),
        }
    }
}

/// One ranked search hit
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The matched index entry
    pub entry: SearchEntry,
    /// Normalized combined score in (0, 1]
    pub score: f32,
    /// Which index produced the hit
    pub source: SourceId,
    /// Entry href resolved against its source's base URL
    pub resolved_href: String,
}

/// Entry with precomputed folded fields and resolved link target
struct IndexedEntry {
    entry: SearchEntry,
    resolved_href: String,
    folded_title: String,
    folded_text: String,
    folded_object_id: Option<String>,
    folded_section: Option<String>,
}

/// One loaded source's matcher context. Rebuilt whenever the source's index
/// content changes, never mutated in place.
struct SourceIndex {
    id: SourceId,
    entries: Vec<IndexedEntry>,
}

/// Fuzzy search engine over the loaded indexes
pub struct SearchEngine {
    matcher: SkimMatcherV2,
    weights: FieldWeights,
    threshold: f32,
    sources: Vec<SourceIndex>,
}

impl SearchEngine {
    /// Create an engine with no loaded indexes
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
            weights: config.weights.clone(),
            threshold: config.threshold,
            sources: Vec::new(),
        }
    }

    /// Load or replace one source's index. Source order is insertion order and
    /// defines the deterministic tie-break between equally scored results.
    pub fn build_index(&mut self, index: SearchIndex) {
        let entries = index
            .entries
            .into_iter()
            .map(|entry| IndexedEntry {
                resolved_href: TextUtils::join_url(&index.base_url, &entry.href),
                folded_title: fold(&entry.title),
                folded_text: fold(&entry.text),
                folded_object_id: entry.object_id.as_deref().map(fold),
                folded_section: entry.section.as_deref().map(fold),
                entry,
            })
            .collect();

        let rebuilt = SourceIndex {
            id: index.source,
            entries,
        };

        if let Some(existing) = self.sources.iter_mut().find(|s| s.id == rebuilt.id) {
            *existing = rebuilt;
        } else {
            self.sources.push(rebuilt);
        }
    }

    /// Drop one source's index
    pub fn remove_index(&mut self, id: &SourceId) {
        self.sources.retain(|s| &s.id != id);
    }

    /// Whether an index is loaded for the given source
    pub fn has_source(&self, id: &SourceId) -> bool {
        self.sources.iter().any(|s| &s.id == id)
    }

    /// Identifiers of all loaded sources, in rank order
    pub fn loaded_sources(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    /// Search the active sources. Empty and whitespace-only queries return an
    /// empty sequence; an unmatched query returns an empty sequence, never an
    /// error.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<QueryResult> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let folded_query = fold(trimmed);
        // Score of the query matched against itself: the normalization anchor
        // for the similarity threshold.
        let Some(self_score) = self.matcher.fuzzy_match(&folded_query, &folded_query) else {
            return Vec::new();
        };
        let self_score = self_score as f32;
        if self_score <= 0.0 {
            return Vec::new();
        }

        let mut merged: Vec<QueryResult> = Vec::new();

        for source in &self.sources {
            if let Some(active) = &options.active_sources {
                if !active.contains(&source.id) {
                    continue;
                }
            }

            let mut hits: Vec<(f32, &IndexedEntry)> = source
                .entries
                .iter()
                .filter(|indexed| self.passes_object_filter(indexed, options))
                .filter_map(|indexed| {
                    self.score_entry(indexed, &folded_query, self_score)
                        .map(|score| (score, indexed))
                })
                .collect();

            // Stable sort keeps index order among equal scores
            hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            hits.truncate(options.limit);

            merged.extend(hits.into_iter().map(|(score, indexed)| QueryResult {
                entry: indexed.entry.clone(),
                score,
                source: source.id.clone(),
                resolved_href: indexed.resolved_href.clone(),
            }));
        }

        // Stable sort: ties keep (source order, within-index rank)
        merged.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(cap) = options.combined_limit {
            merged.truncate(cap);
        }

        merged
    }

    fn passes_object_filter(&self, indexed: &IndexedEntry, options: &SearchOptions) -> bool {
        if options.object_filter.is_empty() {
            return true;
        }
        indexed
            .entry
            .object_id
            .as_ref()
            .is_some_and(|id| options.object_filter.contains(id))
    }

    /// Weighted best-field score, normalized by the query's self score.
    /// Returns `None` below the similarity threshold.
    fn score_entry(
        &self,
        indexed: &IndexedEntry,
        folded_query: &str,
        self_score: f32,
    ) -> Option<f32> {
        let field = |text: &str, weight: f32| -> f32 {
            if weight <= 0.0 {
                return 0.0;
            }
            let raw = self
                .matcher
                .fuzzy_match(text, folded_query)
                .unwrap_or(0) as f32;
            weight * (raw / self_score).min(1.0)
        };

        let mut best = field(&indexed.folded_title, self.weights.title);
        best = best.max(field(&indexed.folded_text, self.weights.text));
        if let Some(object_id) = &indexed.folded_object_id {
            best = best.max(field(object_id, self.weights.object_id));
        }
        if let Some(section) = &indexed.folded_section {
            best = best.max(field(section, self.weights.section));
        }

        (best >= self.threshold && best > 0.0).then_some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    fn entry(title: &str, text: &str, href: &str) -> SearchEntry {
        SearchEntry {
            title: title.to_string(),
            text: text.to_string(),
            href: href.to_string(),
            object_id: None,
            section: None,
        }
    }

    fn entry_with_object(title: &str, text: &str, href: &str, object_id: &str) -> SearchEntry {
        SearchEntry {
            object_id: Some(object_id.to_string()),
            ..entry(title, text, href)
        }
    }

    fn primary_index(entries: Vec<SearchEntry>) -> SearchIndex {
        SearchIndex {
            source: SourceId::Primary,
            base_url: String::new(),
            entries,
        }
    }

    fn engine_with(entries: Vec<SearchEntry>) -> SearchEngine {
        let mut engine = SearchEngine::new(&SearchConfig::default());
        engine.build_index(primary_index(entries));
        engine
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let engine = engine_with(vec![entry("Install", "How to install", "/install.html")]);
        assert!(engine.search("", &SearchOptions::with_limit(10)).is_empty());
        assert!(engine
            .search("   \t ", &SearchOptions::with_limit(10))
            .is_empty());
    }

    #[test]
    fn test_unmatched_query_returns_nothing() {
        let engine = engine_with(vec![entry("Install", "How to install the theme", "/i.html")]);
        assert!(engine
            .search("zzzzqqqq", &SearchOptions::with_limit(10))
            .is_empty());
    }

    #[test]
    fn test_single_match_scenario() {
        let engine = engine_with(vec![entry(
            "Install",
            "How to install the theme",
            "/install.html",
        )]);

        let results = engine.search("theme", &SearchOptions::with_limit(10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolved_href, "/install.html");
        assert_eq!(results[0].source, SourceId::Primary);
        assert!(results[0].score >= 0.3);
    }

    #[test]
    fn test_search_is_deterministic() {
        let entries = vec![
            entry("Theme options", "Configuring the theme", "/options.html"),
            entry("Theming guide", "Theme colors and fonts", "/guide.html"),
            entry("Install", "How to install the theme", "/install.html"),
        ];
        let engine = engine_with(entries);

        let first = engine.search("theme", &SearchOptions::with_limit(10));
        let second = engine.search("theme", &SearchOptions::with_limit(10));

        let hrefs = |rs: &[QueryResult]| {
            rs.iter()
                .map(|r| r.resolved_href.clone())
                .collect::<Vec<_>>()
        };
        assert!(!first.is_empty());
        assert_eq!(hrefs(&first), hrefs(&second));
    }

    #[test]
    fn test_per_source_limit() {
        let entries = (0..20)
            .map(|i| entry("Theme", "theme page", &format!("/p{}.html", i)))
            .collect();
        let engine = engine_with(entries);

        let results = engine.search("theme", &SearchOptions::with_limit(5));
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_combined_limit_caps_merged_sequence() {
        let mut engine = engine_with(vec![
            entry("Theme A", "theme", "/a.html"),
            entry("Theme B", "theme", "/b.html"),
        ]);
        engine.build_index(SearchIndex {
            source: SourceId::Library("pyvista".to_string()),
            base_url: "https://docs.pyvista.org".to_string(),
            entries: vec![
                entry("Theme C", "theme", "c.html"),
                entry("Theme D", "theme", "d.html"),
            ],
        });

        let mut options = SearchOptions::with_limit(10);
        options.combined_limit = Some(3);
        let results = engine.search("theme", &options);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_library_hrefs_resolve_against_base_url() {
        let mut engine = SearchEngine::new(&SearchConfig::default());
        engine.build_index(SearchIndex {
            source: SourceId::Library("pyvista".to_string()),
            base_url: "https://docs.pyvista.org".to_string(),
            entries: vec![entry("Plotting theme", "theme for plots", "api/theme.html")],
        });

        let results = engine.search("theme", &SearchOptions::with_limit(10));
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].resolved_href,
            "https://docs.pyvista.org/api/theme.html"
        );
        assert_eq!(
            results[0].source,
            SourceId::Library("pyvista".to_string())
        );
    }

    #[test]
    fn test_inactive_sources_are_skipped() {
        let mut engine = engine_with(vec![entry("Theme", "theme", "/a.html")]);
        engine.build_index(SearchIndex {
            source: SourceId::Library("pyvista".to_string()),
            base_url: "https://docs.pyvista.org".to_string(),
            entries: vec![entry("Theme", "theme", "b.html")],
        });

        let mut options = SearchOptions::with_limit(10);
        options.active_sources = Some(vec![SourceId::Primary]);
        let results = engine.search("theme", &options);

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.source == SourceId::Primary));
    }

    #[test]
    fn test_object_filter_post_filters() {
        let engine = engine_with(vec![
            entry_with_object("Theme install", "theme", "/a.html", "install"),
            entry_with_object("Theme options", "theme", "/b.html", "options"),
            entry("Theme misc", "theme", "/c.html"),
        ]);

        let mut options = SearchOptions::with_limit(10);
        options.object_filter.insert("install".to_string());
        let results = engine.search("theme", &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolved_href, "/a.html");

        // Empty filter set means no filtering at all
        let unfiltered = engine.search("theme", &SearchOptions::with_limit(10));
        assert_eq!(unfiltered.len(), 3);
    }

    #[test]
    fn test_rebuild_replaces_index_content() {
        let mut engine = engine_with(vec![entry("Theme", "theme", "/old.html")]);
        engine.build_index(primary_index(vec![entry("Theme", "theme", "/new.html")]));

        let results = engine.search("theme", &SearchOptions::with_limit(10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolved_href, "/new.html");
    }

    #[test]
    fn test_diacritics_fold_for_matching() {
        let engine = engine_with(vec![entry("Café setup", "configuring the café", "/cafe.html")]);
        let results = engine.search("cafe", &SearchOptions::with_limit(10));
        assert_eq!(results.len(), 1);
    }
}
