//! # Text Normalization Module
//!
//! ## Purpose
//! Query and field normalization for matching: Unicode decomposition with
//! diacritic stripping, case folding, and query term extraction.
//!
//! ## Input/Output Specification
//! - **Input**: Raw query strings and entry field text
//! - **Output**: Folded strings suitable for fuzzy comparison, query term lists
//! - **Guarantee**: Folding is idempotent and never fails

use unicode_normalization::UnicodeNormalization;

/// Fold text for matching: NFKD decomposition, combining marks stripped,
/// lowercased. Accented field text matches unaccented queries and vice versa.
pub fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a query into whitespace-delimited, non-empty terms.
pub fn query_terms(query: &str) -> Vec<&str> {
    query.split_whitespace().filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_lowercases() {
        assert_eq!(fold("Install THE Theme"), "install the theme");
    }

    #[test]
    fn test_fold_strips_diacritics() {
        assert_eq!(fold("Café Résumé"), "cafe resume");
    }

    #[test]
    fn test_fold_is_idempotent() {
        let once = fold("Naïve Mëtal");
        assert_eq!(fold(&once), once);
    }

    #[test]
    fn test_query_terms_splits_on_whitespace() {
        assert_eq!(query_terms("  install   theme "), vec!["install", "theme"]);
        assert!(query_terms("   ").is_empty());
    }
}
