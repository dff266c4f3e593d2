//! Search controller: debounce, supersession and pagination
//!
//! Every public operation takes the internal lock, decides, spawns at most
//! one task and returns. Spawned tasks carry the token that was current when
//! they were scheduled and re-check it under the lock before committing an
//! event, so an outcome from a superseded operation is dropped even if its
//! abort arrives too late to stop the future.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use sift_client::{ClientError, ClientResult, SearchClient};
use sift_core::{LoadingState, SearchEvent, SearchResponse, SearchState};

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    /// A search is scheduled and its quiet period has not elapsed
    Debouncing,
    Searching,
    LoadingMore,
}

struct Inner {
    state: SearchState,
    /// Bumped by every search, clear and dispose
    search_generation: u64,
    /// Bumped whenever `results` is reset
    results_epoch: u64,
    debouncing: bool,
    search_task: Option<JoinHandle<()>>,
    load_more_task: Option<JoinHandle<()>>,
    /// `None` once disposed, which closes every subscriber
    updates: Option<watch::Sender<SearchState>>,
    disposed: bool,
}

impl Inner {
    fn new() -> Self {
        let (updates, _) = watch::channel(SearchState::default());
        Self {
            state: SearchState::default(),
            search_generation: 0,
            results_epoch: 0,
            debouncing: false,
            search_task: None,
            load_more_task: None,
            updates: Some(updates),
            disposed: false,
        }
    }

    fn commit(&mut self, event: SearchEvent) {
        if matches!(event, SearchEvent::SearchStarted { .. } | SearchEvent::Cleared) {
            self.results_epoch += 1;
            self.abort_load_more();
        }

        self.state = std::mem::take(&mut self.state).apply(event);

        if let Some(updates) = &self.updates {
            updates.send_replace(self.state.clone());
        }
    }

    /// Invalidate the scheduled or in-flight search, returning the new generation
    fn supersede_search(&mut self) -> u64 {
        self.search_generation += 1;
        self.debouncing = false;
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        self.search_generation
    }

    fn abort_load_more(&mut self) {
        if let Some(task) = self.load_more_task.take() {
            task.abort();
        }
    }
}

/// Owns one search session's state and the tasks that feed it
///
/// Operations are fire-and-forget: they never fail and never block on the
/// backend. Observe progress through [`state`](Self::state),
/// [`subscribe`](Self::subscribe) or [`settled`](Self::settled).
///
/// Dropping the controller disposes it.
pub struct SearchController<C: SearchClient + 'static> {
    client: Arc<C>,
    config: ControllerConfig,
    runtime: Handle,
    inner: Arc<Mutex<Inner>>,
}

impl<C: SearchClient + 'static> SearchController<C> {
    /// Create a controller bound to the current Tokio runtime
    pub fn new(client: C, config: ControllerConfig) -> ControllerResult<Self> {
        let runtime = Handle::try_current().map_err(|_| ControllerError::NoRuntime)?;
        Self::with_runtime(client, config, runtime)
    }

    /// Create a controller that spawns its tasks on `runtime`
    pub fn with_runtime(
        client: C,
        config: ControllerConfig,
        runtime: Handle,
    ) -> ControllerResult<Self> {
        config.validate()?;
        Ok(Self {
            client: Arc::new(client),
            config,
            runtime,
            inner: Arc::new(Mutex::new(Inner::new())),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Keystroke entry point: search for `text` after the configured debounce
    pub fn search(&self, text: &str) {
        self.search_with_delay(text, self.config.debounce());
    }

    /// Search for `text` after `delay`; `Duration::ZERO` searches on the next
    /// scheduler tick (explicit submit).
    ///
    /// Any scheduled or in-flight search is cancelled before this returns.
    /// Blank text clears the state instead of searching.
    pub fn search_with_delay(&self, text: &str, delay: Duration) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            tracing::debug!("Ignoring search on disposed controller");
            return;
        }

        let generation = inner.supersede_search();

        if text.trim().is_empty() {
            tracing::debug!(generation, "Blank query, clearing search");
            inner.commit(SearchEvent::Cleared);
            return;
        }

        tracing::debug!(
            generation,
            query = text,
            delay_ms = delay.as_millis() as u64,
            "Scheduling search"
        );

        inner.debouncing = true;
        let task = self.runtime.spawn(run_search(
            Arc::clone(&self.inner),
            Arc::clone(&self.client),
            text.to_string(),
            delay,
            generation,
        ));
        inner.search_task = Some(task);
    }

    /// Fetch the page after `current_page` and append it.
    ///
    /// No-op while any fetch is in flight or when every page is loaded.
    pub fn load_more(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed || !inner.state.can_load_more() {
            tracing::debug!(
                loading = ?inner.state.loading,
                has_more = inner.state.has_more(),
                disposed = inner.disposed,
                "Ignoring load_more"
            );
            return;
        }

        let query = inner.state.query.clone();
        let page = inner.state.current_page + 1;
        let epoch = inner.results_epoch;

        tracing::debug!(query = %query, page, "Loading more results");

        inner.commit(SearchEvent::LoadMoreStarted);
        let task = self.runtime.spawn(run_load_more(
            Arc::clone(&self.inner),
            Arc::clone(&self.client),
            query,
            page,
            epoch,
        ));
        inner.load_more_task = Some(task);
    }

    /// Cancel everything and return to the initial empty state
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        let generation = inner.supersede_search();
        tracing::debug!(generation, "Clearing search");
        inner.commit(SearchEvent::Cleared);
    }

    /// Re-run the last dispatched query immediately. No-op without a query.
    pub fn retry(&self) {
        let query = {
            let inner = self.inner.lock();
            if inner.disposed {
                return;
            }
            inner.state.query.clone()
        };

        if query.trim().is_empty() {
            return;
        }
        tracing::debug!(query = %query, "Retrying search");
        self.search_with_delay(&query, Duration::ZERO);
    }

    /// Cancel all pending work; later operations are ignored and the state
    /// is frozen. Subscribers see their channel close.
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.supersede_search();
        inner.results_epoch += 1;
        inner.abort_load_more();
        inner.updates = None;
        tracing::debug!("Search controller disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.inner.lock().state.clone()
    }

    pub fn phase(&self) -> ControllerPhase {
        let inner = self.inner.lock();
        if inner.debouncing {
            return ControllerPhase::Debouncing;
        }
        match inner.state.loading {
            LoadingState::Idle => ControllerPhase::Idle,
            LoadingState::Searching => ControllerPhase::Searching,
            LoadingState::LoadingMore => ControllerPhase::LoadingMore,
        }
    }

    /// Receive every state the controller publishes
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        let inner = self.inner.lock();
        match &inner.updates {
            Some(updates) => updates.subscribe(),
            None => watch::channel(inner.state.clone()).1,
        }
    }

    /// Wait until nothing is scheduled or in flight, then return the state.
    ///
    /// Never resolves if the backend never answers.
    pub async fn settled(&self) -> SearchState {
        let mut updates = self.subscribe();
        loop {
            updates.borrow_and_update();
            if self.is_disposed() || self.phase() == ControllerPhase::Idle {
                return self.state();
            }
            if updates.changed().await.is_err() {
                return self.state();
            }
        }
    }
}

impl<C: SearchClient + 'static> Drop for SearchController<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Reject a response for a page other than the one requested; appending it
/// would break `results == pages 1..=current_page`.
fn expect_page(response: SearchResponse, requested: u32) -> ClientResult<SearchResponse> {
    if response.page != requested {
        return Err(ClientError::Backend(format!(
            "unexpected page {} (requested page {})",
            response.page, requested
        )));
    }
    Ok(response)
}

async fn run_search<C: SearchClient>(
    inner: Arc<Mutex<Inner>>,
    client: Arc<C>,
    query: String,
    delay: Duration,
    generation: u64,
) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    {
        let mut guard = inner.lock();
        if guard.search_generation != generation {
            return;
        }
        guard.debouncing = false;
        guard.commit(SearchEvent::SearchStarted {
            query: query.clone(),
        });
    }

    tracing::debug!(generation, query = %query, "Dispatching search");
    let outcome = client.search(&query, 1).await;

    let mut guard = inner.lock();
    if guard.search_generation != generation {
        tracing::debug!(generation, query = %query, "Discarding superseded search outcome");
        return;
    }
    guard.search_task = None;

    let event = match outcome.and_then(|response| expect_page(response, 1)) {
        Ok(page) => {
            tracing::info!(
                query = %query,
                results = page.data.len(),
                total = page.total,
                "Search completed"
            );
            SearchEvent::SearchSucceeded(page)
        }
        Err(err) if err.is_cancelled() => {
            tracing::debug!(query = %query, "Search cancelled by backend");
            SearchEvent::FetchAbandoned
        }
        Err(err) => {
            tracing::warn!(query = %query, error = %err, "Search failed");
            SearchEvent::SearchFailed(err.to_string())
        }
    };
    guard.commit(event);
}

async fn run_load_more<C: SearchClient>(
    inner: Arc<Mutex<Inner>>,
    client: Arc<C>,
    query: String,
    page: u32,
    epoch: u64,
) {
    let outcome = client.search(&query, page).await;

    let mut guard = inner.lock();
    if guard.results_epoch != epoch {
        tracing::debug!(query = %query, page, "Discarding stale page");
        return;
    }
    guard.load_more_task = None;

    let event = match outcome.and_then(|response| expect_page(response, page)) {
        Ok(response) => {
            tracing::info!(
                query = %query,
                page = response.page,
                results = response.data.len(),
                "Loaded more results"
            );
            SearchEvent::LoadMoreSucceeded(response)
        }
        Err(err) if err.is_cancelled() => {
            tracing::debug!(query = %query, page, "Load more cancelled by backend");
            SearchEvent::FetchAbandoned
        }
        Err(err) => {
            tracing::warn!(query = %query, page, error = %err, "Load more failed");
            SearchEvent::LoadMoreFailed(err.to_string())
        }
    };
    guard.commit(event);
}
