//! # Utilities Module
//!
//! ## Purpose
//! Common utility functions used throughout the search engine for text display,
//! URL handling, and performance monitoring.
//!
//! ## Input/Output Specification
//! - **Input**: Various data types requiring common operations
//! - **Output**: Processed data, timing measurements
//! - **Functions**: HTML escaping, truncation, URL joining, char-boundary math

use std::time::Instant;

/// Performance timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

/// Text display utilities
pub struct TextUtils;

impl Timer {
    /// Start a new timer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and log duration
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("Timer '{}' completed in {}ms", self.name, elapsed);
        elapsed
    }
}

impl TextUtils {
    /// Escape text for safe embedding in HTML
    pub fn escape_html(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Truncate text to at most `max_length` characters, appending an ellipsis
    /// when anything was cut
    pub fn truncate(text: &str, max_length: usize) -> String {
        if text.chars().count() <= max_length {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_length).collect();
            format!("{}…", cut)
        }
    }

    /// Join a base URL and a relative href with exactly one separating slash.
    /// Absolute hrefs (scheme-qualified) pass through untouched.
    pub fn join_url(base: &str, href: &str) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        if base.is_empty() {
            return href.to_string();
        }
        match (base.ends_with('/'), href.starts_with('/')) {
            (true, true) => format!("{}{}", base, &href[1..]),
            (false, false) => format!("{}/{}", base, href),
            _ => format!("{}{}", base, href),
        }
    }

    /// Largest char-boundary index not greater than `index`
    pub fn floor_char_boundary(text: &str, index: usize) -> usize {
        if index >= text.len() {
            return text.len();
        }
        let mut i = index;
        while !text.is_char_boundary(i) {
            i -= 1;
        }
        i
    }

    /// Smallest char-boundary index not less than `index`
    pub fn ceil_char_boundary(text: &str, index: usize) -> usize {
        if index >= text.len() {
            return text.len();
        }
        let mut i = index;
        while !text.is_char_boundary(i) {
            i += 1;
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            TextUtils::escape_html(r#"<b>"A&B"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"
        );
        assert_eq!(TextUtils::escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(TextUtils::truncate("Hello world", 20), "Hello world");
        assert_eq!(TextUtils::truncate("abcdefgh", 5), "abcde…");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            TextUtils::join_url("https://docs.pyvista.org", "api/index.html"),
            "https://docs.pyvista.org/api/index.html"
        );
        assert_eq!(
            TextUtils::join_url("https://docs.pyvista.org/", "/api/index.html"),
            "https://docs.pyvista.org/api/index.html"
        );
        assert_eq!(TextUtils::join_url("", "install.html"), "install.html");
        assert_eq!(
            TextUtils::join_url("../..", "https://other.site/x.html"),
            "https://other.site/x.html"
        );
    }

    #[test]
    fn test_char_boundaries() {
        let text = "héllo";
        // 'é' occupies bytes 1..3
        assert_eq!(TextUtils::floor_char_boundary(text, 2), 1);
        assert_eq!(TextUtils::ceil_char_boundary(text, 2), 3);
        assert_eq!(TextUtils::floor_char_boundary(text, 99), text.len());
    }
}
