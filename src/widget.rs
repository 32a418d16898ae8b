//! # Search Widget Module
//!
//! ## Purpose
//! One widget instance per search UI: owns its engine, filter state,
//! controller, and host handle, and wires them together with the debounce
//! timer. Multiple independent widgets can coexist on one page; there is no
//! shared module state.
//!
//! ## Input/Output Specification
//! - **Input**: [`WidgetEvent`]s from the hosting UI, filter toggles
//! - **Output**: Host calls (render, banners, navigation)
//! - **Ordering**: Only the most recently issued query's completion reaches
//!   the host; stale completions are discarded by the controller
//!
//! ## Concurrency
//! Everything runs on one task. The debounce timer is the sole timing
//! primitive: each keystroke re-arms the deadline, so only the last keystroke
//! within the quiet period triggers a search.

use crate::config::Config;
use crate::controller::{Effect, Event, QueryController, UiState};
use crate::engine::{SearchEngine, SearchOptions};
use crate::errors::Result;
use crate::filters::{Facet, FilterState};
use crate::host::SearchUiHost;
use crate::loader::{configured_sources, IndexLoader};
use crate::presenter::{DisplayRecord, ResultPresenter};
use crate::SourceId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Events the hosting UI feeds into a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Click or focus on the search input
    Focus,
    /// The input value changed; carries the full new value
    Keystroke(String),
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

/// One search widget instance
pub struct SearchWidget<H: SearchUiHost> {
    config: Config,
    engine: SearchEngine,
    filters: FilterState,
    controller: QueryController,
    presenter: ResultPresenter,
    host: H,
    last_records: Vec<DisplayRecord>,
    available: bool,
    debounce_deadline: Option<Instant>,
    events_tx: UnboundedSender<WidgetEvent>,
    events_rx: Option<UnboundedReceiver<WidgetEvent>>,
}

impl<H: SearchUiHost> SearchWidget<H> {
    /// Create a widget, loading the configured indexes (cache-first). A failed
    /// primary load leaves the widget in the "search unavailable" state; a
    /// failed library load only removes that library from the result mix.
    pub async fn new(config: Config, host: H) -> Result<Self> {
        config.validate()?;

        let loader = IndexLoader::new(config.cache.clone());
        let sources = configured_sources(&config.sources);
        let mut engine = SearchEngine::new(&config.search);

        for (id, outcome) in loader.load_all(&sources).await {
            match outcome {
                Ok(index) => engine.build_index(index),
                Err(e) => warn!("Source '{}' will not contribute results: {}", id, e),
            }
        }

        Ok(Self::from_parts(config, engine, host))
    }

    /// Create a widget over an engine whose indexes are already loaded. Used
    /// by embedders that manage index loading themselves, and by tests.
    pub fn from_parts(config: Config, engine: SearchEngine, host: H) -> Self {
        let available = engine.has_source(&SourceId::Primary);
        if !available {
            warn!("Primary index missing; widget will report search unavailable");
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            controller: QueryController::new(config.search.min_query_length),
            presenter: ResultPresenter::new(config.snippet.clone()),
            filters: FilterState::new(),
            last_records: Vec::new(),
            available,
            debounce_deadline: None,
            events_tx,
            events_rx: Some(events_rx),
            config,
            engine,
            host,
        }
    }

    /// Sender for feeding events into [`run`](Self::run)
    pub fn event_sender(&self) -> UnboundedSender<WidgetEvent> {
        self.events_tx.clone()
    }

    /// Current controller state
    pub fn ui_state(&self) -> UiState {
        self.controller.state()
    }

    /// Whether the primary index loaded
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Current facet selections
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Drive the widget until every sender is dropped. The debounce deadline
    /// is re-armed by keystrokes and fires exactly once per quiet period.
    pub async fn run(mut self) {
        let Some(mut events) = self.events_rx.take() else {
            return;
        };

        loop {
            let deadline = self.debounce_deadline;
            tokio::select! {
                biased;
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event),
                        None => break,
                    }
                }
                _ = sleep_until_deadline(deadline), if deadline.is_some() => {
                    self.debounce_deadline = None;
                    self.fire_debounce();
                }
            }
        }
    }

    /// Apply one UI event
    pub fn handle_event(&mut self, event: WidgetEvent) {
        let event = match event {
            WidgetEvent::Focus => Event::Focus,
            WidgetEvent::Keystroke(value) => Event::Keystroke { value },
            WidgetEvent::Escape => Event::Escape,
            WidgetEvent::PointerOutside => Event::PointerOutside,
            WidgetEvent::ArrowDown => Event::ArrowDown,
            WidgetEvent::ArrowUp => Event::ArrowUp,
            WidgetEvent::Enter => Event::Enter,
            WidgetEvent::GlobalShortcut => Event::GlobalShortcut,
        };
        let effects = self.controller.step(event);
        self.apply(effects);
    }

    /// Toggle one facet value and re-run the current query
    pub fn toggle_filter(&mut self, facet: Facet, value: &str) {
        self.filters.toggle(facet, value);
        self.rerun_current_query();
    }

    /// Toggle a facet category and re-run the current query
    pub fn toggle_facet_category(&mut self, facet: Facet) {
        self.filters.toggle_category(facet);
        self.rerun_current_query();
    }

    /// Change the per-source result limit and re-run the current query
    pub fn set_result_limit(&mut self, limit: usize) {
        if limit == 0 {
            return;
        }
        self.config.search.result_limit = limit;
        self.rerun_current_query();
    }

    /// Run an immediate search for a query handed over by the page (the `?q=`
    /// query-string convention), bypassing the debounce.
    pub fn bootstrap_query(&mut self, query: &str) {
        self.host.set_input_value(query);
        let effects = self.controller.step(Event::Focus);
        self.apply(effects);
        let effects = self.controller.step(Event::DebounceFired {
            value: query.to_string(),
        });
        self.apply(effects);
    }

    /// The debounce quiet period elapsed: search for the live input value
    fn fire_debounce(&mut self) {
        let value = self.host.input_value();
        let effects = self.controller.step(Event::DebounceFired { value });
        self.apply(effects);
    }

    /// Re-run the current input's query immediately (after a filter change)
    fn rerun_current_query(&mut self) {
        let value = self.host.input_value();
        let effects = self.controller.step(Event::DebounceFired { value });
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FocusInput => self.host.focus_input(),
                Effect::ScheduleDebounce => {
                    self.debounce_deadline = Some(Instant::now() + self.config.debounce());
                }
                Effect::ClearResults => {
                    self.last_records.clear();
                    self.host.clear_results();
                }
                Effect::ShowSearching => self.host.show_searching(),
                Effect::IssueSearch { seq, query } => self.execute_search(seq, &query),
                Effect::RenderResults => self.host.render(&self.last_records),
                Effect::ShowNoResults => self.host.show_no_results(),
                Effect::ShowUnavailable => self.host.show_unavailable(),
                Effect::Collapse => {
                    self.last_records.clear();
                    self.debounce_deadline = None;
                    self.host.collapse();
                }
                Effect::FocusResult(index) => self.host.focus_result(index),
                Effect::Navigate { index } => {
                    if let Some(record) = self.last_records.get(index) {
                        debug!("Navigating to {}", record.href);
                        self.host.navigate(&record.href);
                    }
                }
            }
        }
    }

    fn execute_search(&mut self, seq: u64, query: &str) {
        if !self.available {
            let effects = self.controller.step(Event::SearchFailed { seq });
            self.apply(effects);
            return;
        }

        let options = self.search_options();
        let results = self.engine.search(query, &options);
        self.last_records = self.presenter.present(&results, query);

        let effects = self.controller.step(Event::ResultsReady {
            seq,
            count: self.last_records.len(),
        });
        self.apply(effects);
    }

    /// Search options derived from configuration and facet selections
    fn search_options(&self) -> SearchOptions {
        let mut active = Vec::new();
        if self.filters.primary_active() {
            active.push(SourceId::Primary);
        }
        for library in self.filters.selected_libraries() {
            active.push(SourceId::Library(library.clone()));
        }

        SearchOptions {
            limit: self.config.search.result_limit,
            combined_limit: self.config.search.combined_limit,
            active_sources: Some(active),
            object_filter: self.filters.selected_objects().iter().cloned().collect(),
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
