//! # Query Controller Module
//!
//! ## Purpose
//! The orchestrating state machine for one search widget: debounced input
//! handling, keyboard navigation over rendered results, expand/collapse of the
//! search panel, and discarding of stale search completions.
//!
//! ## Input/Output Specification
//! - **Input**: UI events (`Event`)
//! - **Output**: Effects (`Effect`) the owning widget performs against the
//!   engine and host
//! - **Ordering**: UI state always reflects the most recently issued query;
//!   completions carrying an older sequence number are discarded
//!
//! ## State Machine
//! `Collapsed -> Expanded -> Searching -> {ResultsShown | NoResults} -> Collapsed`
//!
//! One pure transition function consumes `{current state, event}` and returns
//! the effects to perform. The controller holds no handles to the engine or
//! host, which keeps every transition directly testable.

/// UI state of one search widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// Panel hidden, input blurred
    Collapsed,
    /// Input focused, no search in flight
    Expanded,
    /// A search has been issued and not yet completed
    Searching,
    /// Results are rendered
    ResultsShown,
    /// The last search matched nothing
    NoResults,
}

/// Input events consumed by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Click or focus on the search input
    Focus,
    /// Input value changed
    Keystroke { value: String },
    /// The debounce quiet period elapsed; `value` is the live input value
    DebounceFired { value: String },
    /// A search completed with `count` rendered records
    ResultsReady { seq: u64, count: usize },
    /// A search could not run (engine unavailable)
    SearchFailed { seq: u64 },
    /// Escape key
    Escape,
    /// Pointer interaction outside the input and results panel
    PointerOutside,
    /// Move selection forward
    ArrowDown,
    /// Move selection backward
    ArrowUp,
    /// Navigate to the selected result
    Enter,
    /// Global expand shortcut (Ctrl+K / Cmd+K)
    GlobalShortcut,
}

/// Effects the owning widget performs after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Focus the search input
    FocusInput,
    /// Arm (or re-arm) the debounce timer
    ScheduleDebounce,
    /// Clear any rendered results
    ClearResults,
    /// Show the transient searching banner
    ShowSearching,
    /// Run the search tagged with `seq`
    IssueSearch { seq: u64, query: String },
    /// Render the completed search's records
    RenderResults,
    /// Show the no-results banner
    ShowNoResults,
    /// Show the search-unavailable banner
    ShowUnavailable,
    /// Collapse the panel and clear the input
    Collapse,
    /// Move visual focus to the selected result
    FocusResult(usize),
    /// Navigate to the rendered result at `index`
    Navigate { index: usize },
}

/// State machine for one search widget
#[derive(Debug)]
pub struct QueryController {
    state: UiState,
    selection: Option<usize>,
    result_count: usize,
    last_issued_seq: u64,
    min_query_length: usize,
}

impl QueryController {
    pub fn new(min_query_length: usize) -> Self {
        Self {
            state: UiState::Collapsed,
            selection: None,
            result_count: 0,
            last_issued_seq: 0,
            min_query_length,
        }
    }

    /// Current UI state
    pub fn state(&self) -> UiState {
        self.state
    }

    /// Currently selected result index, if any
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Sequence number of the most recently issued search
    pub fn last_issued_seq(&self) -> u64 {
        self.last_issued_seq
    }

    /// Apply one event, returning the effects to perform
    pub fn step(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Focus => {
                if self.state == UiState::Collapsed {
                    self.state = UiState::Expanded;
                }
                Vec::new()
            }

            Event::GlobalShortcut => {
                if self.state == UiState::Collapsed {
                    self.state = UiState::Expanded;
                }
                vec![Effect::FocusInput]
            }

            Event::Keystroke { value } => {
                if self.state == UiState::Collapsed {
                    self.state = UiState::Expanded;
                }
                if value.trim().chars().count() < self.min_query_length {
                    self.reset_results();
                    self.state = UiState::Expanded;
                    vec![Effect::ClearResults]
                } else {
                    vec![Effect::ScheduleDebounce]
                }
            }

            Event::DebounceFired { value } => {
                let query = value.trim().to_string();
                if query.chars().count() < self.min_query_length {
                    self.reset_results();
                    if self.state != UiState::Collapsed {
                        self.state = UiState::Expanded;
                    }
                    return vec![Effect::ClearResults];
                }

                self.last_issued_seq += 1;
                self.state = UiState::Searching;
                vec![
                    Effect::ShowSearching,
                    Effect::IssueSearch {
                        seq: self.last_issued_seq,
                        query,
                    },
                ]
            }

            Event::ResultsReady { seq, count } => {
                // Only the most recently issued query may touch UI state, and
                // only while it is still awaited.
                if seq != self.last_issued_seq || self.state != UiState::Searching {
                    return Vec::new();
                }

                self.selection = None;
                self.result_count = count;
                if count > 0 {
                    self.state = UiState::ResultsShown;
                    vec![Effect::RenderResults]
                } else {
                    self.state = UiState::NoResults;
                    vec![Effect::ShowNoResults]
                }
            }

            Event::SearchFailed { seq } => {
                if seq != self.last_issued_seq || self.state != UiState::Searching {
                    return Vec::new();
                }

                self.reset_results();
                self.state = UiState::NoResults;
                vec![Effect::ShowUnavailable]
            }

            Event::Escape | Event::PointerOutside => {
                if self.state == UiState::Collapsed {
                    return Vec::new();
                }
                self.reset_results();
                self.state = UiState::Collapsed;
                vec![Effect::Collapse]
            }

            Event::ArrowDown => {
                if self.result_count == 0 {
                    return Vec::new();
                }
                let next = match self.selection {
                    Some(current) => (current + 1) % self.result_count,
                    None => 0,
                };
                self.selection = Some(next);
                vec![Effect::FocusResult(next)]
            }

            Event::ArrowUp => {
                if self.result_count == 0 {
                    return Vec::new();
                }
                let next = match self.selection {
                    Some(current) => (current + self.result_count - 1) % self.result_count,
                    None => self.result_count - 1,
                };
                self.selection = Some(next);
                vec![Effect::FocusResult(next)]
            }

            Event::Enter => {
                if self.result_count == 0 {
                    return Vec::new();
                }
                let index = self.selection.unwrap_or(0);
                vec![Effect::Navigate { index }]
            }
        }
    }

    fn reset_results(&mut self) {
        self.selection = None;
        self.result_count = 0;
    }
}
