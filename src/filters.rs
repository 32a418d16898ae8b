//! # Filter State Module
//!
//! ## Purpose
//! Tracks the user-selected facets that narrow which indexes and entries
//! participate in a search: document-object selections and external-library
//! selections, plus which facet categories are active.
//!
//! ## Input/Output Specification
//! - **Input**: Explicit user toggles of facet values and categories
//! - **Output**: Membership queries consumed when building search options
//! - **Lifecycle**: Persists for the page session; never cleared implicitly
//!
//! ## Contract
//! No operation may fail; toggling the same value twice is a net no-op.
//! Mutation does not trigger a re-search here — the owning widget re-runs the
//! current query after each toggle, avoiding a hidden dependency cycle.

use std::collections::BTreeSet;

/// Facet axes a user can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Facet {
    /// Filter by owning document identifier
    Documents,
    /// Filter by external library
    Library,
}

/// Per-widget facet selection state
#[derive(Debug, Default, Clone)]
pub struct FilterState {
    selected_objects: BTreeSet<String>,
    selected_libraries: BTreeSet<String>,
    active_categories: BTreeSet<Facet>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle one facet value on or off
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let set = self.selection_mut(facet);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Toggle a whole facet category active or inactive
    pub fn toggle_category(&mut self, facet: Facet) {
        if !self.active_categories.remove(&facet) {
            self.active_categories.insert(facet);
        }
    }

    /// Whether one facet value is currently selected
    pub fn is_active(&self, facet: Facet, value: &str) -> bool {
        self.selection(facet).contains(value)
    }

    /// Currently active facet categories
    pub fn active_categories(&self) -> &BTreeSet<Facet> {
        &self.active_categories
    }

    /// Selected document identifiers
    pub fn selected_objects(&self) -> &BTreeSet<String> {
        &self.selected_objects
    }

    /// Selected external libraries
    pub fn selected_libraries(&self) -> &BTreeSet<String> {
        &self.selected_libraries
    }

    /// Whether the primary index participates: it does unless facet filtering
    /// is active without the Documents category.
    pub fn primary_active(&self) -> bool {
        self.active_categories.is_empty() || self.active_categories.contains(&Facet::Documents)
    }

    fn selection(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Documents => &self.selected_objects,
            Facet::Library => &self.selected_libraries,
        }
    }

    fn selection_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Documents => &mut self.selected_objects,
            Facet::Library => &mut self.selected_libraries,
        }
    }
}
