//! # Result Presenter Module
//!
//! ## Purpose
//! Converts ranked raw search hits into highlighted, snippeted, navigable
//! display records ready for the host UI.
//!
//! ## Input/Output Specification
//! - **Input**: Ranked [`QueryResult`]s and the query that produced them
//! - **Output**: [`DisplayRecord`]s with HTML-safe, highlighted title/snippet
//! - **Snippets**: Windowed around the first term occurrence, ellipsized at
//!   cut edges; plain truncated preview when no term occurs in the text
//!
//! ## Highlighting
//! All query terms are folded into one case-insensitive alternation regex over
//! the escaped terms, so replacement is single-pass and never double-wraps
//! overlapping matches. Entry text is HTML-escaped around the inserted marker
//! spans.

use crate::config::SnippetConfig;
use crate::engine::QueryResult;
use crate::text::query_terms;
use crate::utils::TextUtils;
use regex::{Regex, RegexBuilder};

/// Marker wrapped around matched terms
pub const HIGHLIGHT_OPEN: &str = "<span class=\"highlight\">";
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// One rendered result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// HTML-safe title with highlight spans
    pub title: String,
    /// HTML-safe snippet with highlight spans
    pub snippet: String,
    /// Resolved navigation target
    pub href: String,
    /// Label of the external source, absent for primary results
    pub source_label: Option<String>,
}

/// Turns raw hits into display records
pub struct ResultPresenter {
    config: SnippetConfig,
}

impl ResultPresenter {
    pub fn new(config: SnippetConfig) -> Self {
        Self { config }
    }

    /// Present ranked results for the given query
    pub fn present(&self, results: &[QueryResult], query: &str) -> Vec<DisplayRecord> {
        let regex = term_regex(query);

        results
            .iter()
            .map(|result| DisplayRecord {
                title: highlight(regex.as_ref(), &result.entry.title),
                snippet: self.snippet(regex.as_ref(), &result.entry.text),
                href: result.resolved_href.clone(),
                source_label: result.source.label().map(String::from),
            })
            .collect()
    }

    /// Window the text around the first term occurrence, or fall back to a
    /// truncated preview. Never empty while the text is non-empty.
    fn snippet(&self, regex: Option<&Regex>, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let Some(m) = regex.and_then(|re| re.find(text)) else {
            return TextUtils::escape_html(&TextUtils::truncate(text, self.config.preview_max));
        };

        let start =
            TextUtils::floor_char_boundary(text, m.start().saturating_sub(self.config.window));
        let end =
            TextUtils::ceil_char_boundary(text, (m.end() + self.config.window).min(text.len()));

        let mut snippet = String::new();
        if start > 0 {
            snippet.push('…');
        }
        snippet.push_str(&highlight(regex, &text[start..end]));
        if end < text.len() {
            snippet.push('…');
        }
        snippet
    }
}

/// One case-insensitive alternation over all escaped query terms
fn term_regex(query: &str) -> Option<Regex> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return None;
    }

    let pattern = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// Escape `text` for HTML, wrapping every term match in a highlight span.
/// Text without any match comes back as its plain escaped form.
fn highlight(regex: Option<&Regex>, text: &str) -> String {
    let Some(regex) = regex else {
        return TextUtils::escape_html(text);
    };

    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for m in regex.find_iter(text) {
        out.push_str(&TextUtils::escape_html(&text[last..m.start()]));
        out.push_str(HIGHLIGHT_OPEN);
        out.push_str(&TextUtils::escape_html(m.as_str()));
        out.push_str(HIGHLIGHT_CLOSE);
        last = m.end();
    }
    out.push_str(&TextUtils::escape_html(&text[last..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SearchEntry, SourceId};

    fn presenter() -> ResultPresenter {
        ResultPresenter::new(SnippetConfig::default())
    }

    fn result(title: &str, text: &str, href: &str, source: SourceId) -> QueryResult {
        QueryResult {
            entry: SearchEntry {
                title: title.to_string(),
                text: text.to_string(),
                href: href.to_string(),
                object_id: None,
                section: None,
            },
            score: 1.0,
            source,
            resolved_href: href.to_string(),
        }
    }

    fn strip_markup(snippet: &str) -> String {
        snippet
            .replace(HIGHLIGHT_OPEN, "")
            .replace(HIGHLIGHT_CLOSE, "")
    }

    #[test]
    fn test_highlight_without_terms_is_identity() {
        let re = term_regex("theme");
        assert_eq!(
            highlight(re.as_ref(), "nothing matches in here"),
            "nothing matches in here"
        );
    }

    #[test]
    fn test_highlight_wraps_all_case_insensitive_matches() {
        let re = term_regex("theme");
        let highlighted = highlight(re.as_ref(), "Theme of themes: THEME");
        assert_eq!(
            highlighted,
            "<span class=\"highlight\">Theme</span> of \
             <span class=\"highlight\">theme</span>s: \
             <span class=\"highlight\">THEME</span>"
        );
    }

    #[test]
    fn test_highlight_multi_term_alternation_never_double_wraps() {
        let re = term_regex("install installation");
        let highlighted = highlight(re.as_ref(), "installation guide");
        // Leftmost alternative wins once; the inner "install" is not re-wrapped
        assert_eq!(highlighted.matches(HIGHLIGHT_OPEN).count(), 1);
    }

    #[test]
    fn test_highlight_escapes_html() {
        let re = term_regex("theme");
        let highlighted = highlight(re.as_ref(), "<b>theme</b> & more");
        assert_eq!(
            highlighted,
            "&lt;b&gt;<span class=\"highlight\">theme</span>&lt;/b&gt; &amp; more"
        );
    }

    #[test]
    fn test_snippet_window_is_ellipsized_on_both_sides() {
        let presenter = ResultPresenter::new(SnippetConfig {
            window: 50,
            preview_max: 200,
        });
        let text = format!("{}needle{}", "a".repeat(200), "b".repeat(60));
        let re = term_regex("needle");

        let snippet = presenter.snippet(re.as_ref(), &text);
        assert!(snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));

        let inner = strip_markup(snippet.trim_matches('…'));
        assert!(inner.chars().count() <= 50 * 2 + "needle".len());
        assert!(inner.contains("needle"));
    }

    #[test]
    fn test_snippet_at_text_start_has_no_leading_ellipsis() {
        let text = format!("needle{}", "b".repeat(300));
        let snippet = presenter().snippet(term_regex("needle").as_ref(), &text);
        assert!(!snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));
    }

    #[test]
    fn test_snippet_falls_back_to_preview_without_match() {
        let presenter = ResultPresenter::new(SnippetConfig {
            window: 100,
            preview_max: 20,
        });
        let text = "x".repeat(100);
        let snippet = presenter.snippet(term_regex("absent").as_ref(), &text);
        assert_eq!(snippet, format!("{}…", "x".repeat(20)));
    }

    #[test]
    fn test_snippet_empty_only_for_empty_text() {
        let p = presenter();
        assert_eq!(p.snippet(term_regex("q").as_ref(), ""), "");
        assert!(!p.snippet(term_regex("q").as_ref(), "short text").is_empty());
    }

    #[test]
    fn test_present_carries_href_and_source_label() {
        let p = presenter();
        let records = p.present(
            &[
                result("Install", "How to install the theme", "/install.html", SourceId::Primary),
                result(
                    "Plot themes",
                    "theme gallery",
                    "https://docs.pyvista.org/themes.html",
                    SourceId::Library("pyvista".to_string()),
                ),
            ],
            "theme",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].href, "/install.html");
        assert_eq!(records[0].source_label, None);
        assert!(records[0].snippet.contains(HIGHLIGHT_OPEN));
        assert_eq!(records[1].source_label.as_deref(), Some("pyvista"));
    }
}
