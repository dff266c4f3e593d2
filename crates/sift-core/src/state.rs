//! Search state and its transition function
//!
//! `SearchState` is replaced wholesale on every transition: callers hand the
//! current value and a `SearchEvent` to [`SearchState::apply`] and keep the
//! value it returns. The async controller is a thin shell around this.

use crate::article::Article;
use crate::response::{self, PageInfo, SearchResponse};
use serde::{Deserialize, Serialize};

/// Which kind of fetch, if any, is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadingState {
    #[default]
    Idle,
    /// Fetching page 1 of a fresh query
    Searching,
    /// Fetching the page after `current_page`
    LoadingMore,
}

impl LoadingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Debounce elapsed; page 1 of `query` is being fetched
    SearchStarted { query: String },
    SearchSucceeded(SearchResponse),
    SearchFailed(String),
    /// The backend cancelled the current fetch without a newer operation
    /// taking over
    FetchAbandoned,
    LoadMoreStarted,
    LoadMoreSucceeded(SearchResponse),
    LoadMoreFailed(String),
    /// Back to the initial empty state
    Cleared,
}

impl SearchEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchStarted { .. } => "search_started",
            Self::SearchSucceeded(_) => "search_succeeded",
            Self::SearchFailed(_) => "search_failed",
            Self::FetchAbandoned => "fetch_abandoned",
            Self::LoadMoreStarted => "load_more_started",
            Self::LoadMoreSucceeded(_) => "load_more_succeeded",
            Self::LoadMoreFailed(_) => "load_more_failed",
            Self::Cleared => "cleared",
        }
    }
}

/// Everything a presentation layer needs to render a search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    /// Pages 1..=current_page of `query`, concatenated in order
    pub results: Vec<Article>,

    pub loading: LoadingState,

    /// Message from the last failed fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Last successfully fetched page, 0 before any success
    pub current_page: u32,

    /// The last dispatched query (not the raw input text)
    pub query: String,

    /// Total reported by the backend for `query`
    pub total: u64,

    /// Page size reported by the backend for `query`
    pub page_size: u32,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the next state. Pure and total: every event is accepted in
    /// every state, guarding is the caller's job.
    pub fn apply(self, event: SearchEvent) -> SearchState {
        tracing::trace!(event = event.name(), "Applying search event");

        match event {
            SearchEvent::SearchStarted { query } => SearchState {
                results: Vec::new(),
                loading: LoadingState::Searching,
                error: None,
                current_page: 0,
                query,
                total: 0,
                page_size: 0,
            },

            SearchEvent::SearchSucceeded(page) => SearchState {
                results: page.data,
                loading: LoadingState::Idle,
                error: None,
                current_page: page.page,
                total: page.total,
                page_size: page.page_size,
                ..self
            },

            SearchEvent::SearchFailed(message) | SearchEvent::LoadMoreFailed(message) => {
                SearchState {
                    loading: LoadingState::Idle,
                    error: Some(message),
                    ..self
                }
            }

            SearchEvent::FetchAbandoned => SearchState {
                loading: LoadingState::Idle,
                ..self
            },

            SearchEvent::LoadMoreStarted => SearchState {
                loading: LoadingState::LoadingMore,
                error: None,
                ..self
            },

            SearchEvent::LoadMoreSucceeded(page) => {
                let mut results = self.results;
                results.extend(page.data);
                SearchState {
                    results,
                    loading: LoadingState::Idle,
                    error: None,
                    current_page: page.page,
                    total: page.total,
                    page_size: page.page_size,
                    query: self.query,
                }
            }

            SearchEvent::Cleared => SearchState::default(),
        }
    }

    /// `current_page * page_size < total`
    pub fn has_more(&self) -> bool {
        response::has_more(self.current_page, self.page_size, self.total)
    }

    pub fn is_searching(&self) -> bool {
        self.loading == LoadingState::Searching
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading == LoadingState::LoadingMore
    }

    /// Whether `load_more` would dispatch a fetch
    pub fn can_load_more(&self) -> bool {
        self.loading.is_idle() && self.has_more()
    }

    /// Searching with nothing on screen yet
    pub fn is_initial_load(&self) -> bool {
        self.is_searching() && self.results.is_empty()
    }

    /// A finished query that matched nothing
    pub fn is_empty_result(&self) -> bool {
        !self.query.is_empty()
            && self.results.is_empty()
            && self.loading.is_idle()
            && self.error.is_none()
    }

    /// Every page has been loaded
    pub fn is_end_of_results(&self) -> bool {
        !self.results.is_empty() && !self.has_more() && self.loading.is_idle()
    }

    /// False only for the initial "start searching" screen
    pub fn has_content(&self) -> bool {
        !self.results.is_empty()
            || !self.loading.is_idle()
            || self.error.is_some()
            || !self.query.is_empty()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(
            self.results.len(),
            self.current_page,
            self.page_size,
            self.total,
        )
    }
}
