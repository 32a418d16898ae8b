//! # Host Interface Module
//!
//! ## Purpose
//! Defines the capability interface a hosting UI implements so the engine,
//! presenter, and controller stay testable without a real widget toolkit, and
//! provides an in-memory implementation used by tests and embedders.
//!
//! ## Input/Output Specification
//! - **Input**: Display records, banner requests, navigation targets
//! - **Output**: The current input value, on request
//! - **Side effects**: `navigate` is the only effect visible outside the
//!   widget's own surface
//!
//! ## Architecture
//! - `SearchUiHost` trait: the capability set {input, results surface,
//!   navigation} the widget drives
//! - `MemoryHost`: an in-memory host recording every call, shared by clone

use crate::presenter::DisplayRecord;
use std::sync::{Arc, Mutex};

/// Capability interface the hosting UI implements
pub trait SearchUiHost: Send + Sync {
    /// Current value of the search input
    fn input_value(&self) -> String;

    /// Replace the search input's value (query-string bootstrap)
    fn set_input_value(&self, value: &str);

    /// Move focus to the search input
    fn focus_input(&self);

    /// Render the result list, replacing any previous rendering
    fn render(&self, records: &[DisplayRecord]);

    /// Show the transient searching banner
    fn show_searching(&self);

    /// Show the no-results banner
    fn show_no_results(&self);

    /// Show the search-unavailable banner
    fn show_unavailable(&self);

    /// Move visual focus to the rendered result at `index`
    fn focus_result(&self, index: usize);

    /// Remove all rendered results and banners
    fn clear_results(&self);

    /// Hide the panel and clear the input value
    fn collapse(&self);

    /// Navigate the page to the resolved target URL
    fn navigate(&self, href: &str);
}

#[derive(Debug, Default)]
struct MemoryHostState {
    input: String,
    rendered: Vec<Vec<DisplayRecord>>,
    searching_shown: usize,
    no_results_shown: usize,
    unavailable_shown: usize,
    focused_input: usize,
    focused_result: Option<usize>,
    cleared: usize,
    collapsed: usize,
    navigations: Vec<String>,
}

/// In-memory host recording every interaction. Cloning shares the underlying
/// state, so a test can keep one handle while the widget owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryHostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated input value
    pub fn set_input(&self, value: &str) {
        self.state.lock().unwrap().input = value.to_string();
    }

    /// Most recently rendered record list
    pub fn last_rendered(&self) -> Option<Vec<DisplayRecord>> {
        self.state.lock().unwrap().rendered.last().cloned()
    }

    /// Number of render calls
    pub fn render_count(&self) -> usize {
        self.state.lock().unwrap().rendered.len()
    }

    /// Number of searching banners shown; one per issued search
    pub fn searching_count(&self) -> usize {
        self.state.lock().unwrap().searching_shown
    }

    pub fn no_results_count(&self) -> usize {
        self.state.lock().unwrap().no_results_shown
    }

    pub fn unavailable_count(&self) -> usize {
        self.state.lock().unwrap().unavailable_shown
    }

    pub fn collapse_count(&self) -> usize {
        self.state.lock().unwrap().collapsed
    }

    pub fn focused_result(&self) -> Option<usize> {
        self.state.lock().unwrap().focused_result
    }

    /// All navigation targets, in order
    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }
}

impl SearchUiHost for MemoryHost {
    fn input_value(&self) -> String {
        self.state.lock().unwrap().input.clone()
    }

    fn set_input_value(&self, value: &str) {
        self.state.lock().unwrap().input = value.to_string();
    }

    fn focus_input(&self) {
        self.state.lock().unwrap().focused_input += 1;
    }

    fn render(&self, records: &[DisplayRecord]) {
        self.state.lock().unwrap().rendered.push(records.to_vec());
    }

    fn show_searching(&self) {
        self.state.lock().unwrap().searching_shown += 1;
    }

    fn show_no_results(&self) {
        self.state.lock().unwrap().no_results_shown += 1;
    }

    fn show_unavailable(&self) {
        self.state.lock().unwrap().unavailable_shown += 1;
    }

    fn focus_result(&self, index: usize) {
        self.state.lock().unwrap().focused_result = Some(index);
    }

    fn clear_results(&self) {
        let mut state = self.state.lock().unwrap();
        state.cleared += 1;
        state.focused_result = None;
    }

    fn collapse(&self) {
        let mut state = self.state.lock().unwrap();
        state.collapsed += 1;
        state.input.clear();
        state.focused_result = None;
    }

    fn navigate(&self, href: &str) {
        self.state.lock().unwrap().navigations.push(href.to_string());
    }
}
