//! End-to-end behaviour of the search controller against scripted backends

use std::sync::Arc;
use std::time::Duration;

use sift_client::{ClientError, MockConfig, MockSearchClient, Scripted, ScriptedClient};
use sift_controller::{ControllerConfig, ControllerPhase, SearchController};
use sift_core::{Article, LoadingState, SearchResponse, SearchState};

fn articles(ids: &[u64]) -> Vec<Article> {
    ids.iter()
        .map(|id| Article::new(*id, format!("Article {}", id), format!("Summary {}", id)))
        .collect()
}

fn page(ids: &[u64], page: u32, total: u64) -> SearchResponse {
    SearchResponse::new(articles(ids), page, 10, total).unwrap()
}

fn controller(client: &Arc<ScriptedClient>) -> SearchController<Arc<ScriptedClient>> {
    SearchController::new(Arc::clone(client), ControllerConfig::default()).unwrap()
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Search `query` with zero debounce and wait for the outcome
async fn searched(
    client: &Arc<ScriptedClient>,
    query: &str,
) -> SearchController<Arc<ScriptedClient>> {
    let controller = controller(client);
    controller.search_with_delay(query, Duration::ZERO);
    controller.settled().await;
    controller
}

#[tokio::test(start_paused = true)]
async fn test_zero_debounce_search_populates_first_page() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1, 2, 3], 1, 25));

    let controller = searched(&client, "rust async").await;
    let state = controller.state();

    assert_eq!(state.query, "rust async");
    assert_eq!(state.current_page, 1);
    assert_eq!(state.results, articles(&[1, 2, 3]));
    assert_eq!(state.total, 25);
    assert!(state.has_more());
    assert_eq!(state.loading, LoadingState::Idle);
    assert_eq!(state.error, None);
    assert_eq!(client.calls(), vec![("rust async".to_string(), 1)]);
}

#[tokio::test(start_paused = true)]
async fn test_search_waits_for_debounce() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 1));
    let controller = controller(&client);

    controller.search("test query");
    assert!(controller.state().loading.is_idle());

    advance(299).await;
    assert_eq!(client.call_count(), 0);

    advance(2).await;
    let state = controller.settled().await;
    assert_eq!(client.calls(), vec![("test query".to_string(), 1)]);
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.query, "test query");
}

#[tokio::test(start_paused = true)]
async fn test_blank_search_resets_synchronously() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1, 2], 1, 20));
    let controller = searched(&client, "test").await;
    assert_eq!(controller.state().results.len(), 2);

    controller.search("   ");
    assert_eq!(controller.state(), SearchState::default());

    controller.search("");
    advance(1_000).await;
    assert_eq!(controller.state(), SearchState::default());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_searches_fetch_only_the_last() {
    let client = Arc::new(ScriptedClient::new());
    client.always(Scripted::Respond(page(&[1], 1, 1)));
    let controller = controller(&client);

    controller.search("first");
    advance(100).await;
    controller.search("second");
    advance(100).await;
    controller.search("third");
    advance(400).await;
    let state = controller.settled().await;

    assert_eq!(client.calls(), vec![("third".to_string(), 1)]);
    assert_eq!(state.query, "third");
}

#[tokio::test(start_paused = true)]
async fn test_superseded_in_flight_search_is_discarded() {
    let client = Arc::new(ScriptedClient::new());
    client.push(Scripted::delayed(
        Duration::from_millis(500),
        Scripted::Respond(page(&[1, 2, 3], 1, 3)),
    ));
    client.push(Scripted::delayed(
        Duration::from_millis(50),
        Scripted::Respond(page(&[9], 1, 1)),
    ));
    let controller = controller(&client);

    controller.search_with_delay("slow", Duration::ZERO);
    advance(10).await;
    assert!(controller.state().is_searching());

    controller.search_with_delay("fast", Duration::ZERO);
    // The abandoned search still owns the loading flag until the new one starts
    assert!(controller.state().is_searching());

    advance(1_000).await;
    let state = controller.state();
    assert_eq!(state.query, "fast");
    assert_eq!(state.results, articles(&[9]));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_appends_next_page() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_ok(page(&[2], 2, 20));
    let controller = searched(&client, "test").await;
    assert!(controller.state().has_more());

    let before = controller.state().results;
    controller.load_more();
    assert!(controller.state().is_loading_more());
    let state = controller.settled().await;

    let mut expected = before;
    expected.extend(articles(&[2]));
    assert_eq!(state.results, expected);
    assert_eq!(state.current_page, 2);
    assert!(!state.has_more());
    assert!(state.is_end_of_results());
    assert_eq!(
        client.calls(),
        vec![("test".to_string(), 1), ("test".to_string(), 2)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_load_more_without_more_pages_is_noop() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 1));
    let controller = searched(&client, "test").await;

    let before = controller.state();
    assert!(!before.has_more());

    controller.load_more();
    advance(1_000).await;

    assert_eq!(controller.state(), before);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_while_loading_is_noop() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_pending();
    let controller = searched(&client, "test").await;

    controller.load_more();
    let loading = controller.state();
    assert_eq!(loading.loading, LoadingState::LoadingMore);

    controller.load_more();
    advance(1_000).await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(controller.state(), loading);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_while_searching_is_noop() {
    let client = Arc::new(ScriptedClient::new());
    client.push_pending();
    let controller = controller(&client);

    controller.search_with_delay("test", Duration::ZERO);
    advance(10).await;
    assert!(controller.state().is_searching());

    controller.load_more();
    advance(10).await;
    assert_eq!(client.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_more_keeps_loaded_pages() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_err(ClientError::Backend("Load more error".to_string()));
    let controller = searched(&client, "test").await;
    let before = controller.state();

    controller.load_more();
    let state = controller.settled().await;

    assert_eq!(state.results, before.results);
    assert_eq!(state.current_page, before.current_page);
    assert_eq!(state.error.as_deref(), Some("Backend error: Load more error"));
    assert_eq!(state.loading, LoadingState::Idle);
    assert!(state.can_load_more());
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_sets_error_with_no_results() {
    let client = Arc::new(ScriptedClient::new());
    client.push_err(ClientError::Network("Failed to fetch articles".to_string()));
    let controller = searched(&client, "test").await;
    let state = controller.state();

    assert_eq!(
        state.error.as_deref(),
        Some("Network error: Failed to fetch articles")
    );
    assert!(state.results.is_empty());
    assert_eq!(state.loading, LoadingState::Idle);
    assert_eq!(state.query, "test");
}

#[tokio::test(start_paused = true)]
async fn test_retry_reissues_last_query_immediately() {
    let client = Arc::new(ScriptedClient::new());
    client.push_err(ClientError::Network("down".to_string()));
    client.push_ok(page(&[1], 1, 1));
    let controller = searched(&client, "test").await;
    assert!(controller.state().error.is_some());

    controller.retry();
    let state = controller.settled().await;

    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 1);
    assert_eq!(
        client.calls(),
        vec![("test".to_string(), 1), ("test".to_string(), 1)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_retry_without_query_is_noop() {
    let client = Arc::new(ScriptedClient::new());
    let controller = controller(&client);

    controller.retry();
    advance(1_000).await;

    assert_eq!(client.call_count(), 0);
    assert_eq!(controller.phase(), ControllerPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_rejects_wrong_page() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_ok(page(&[1], 1, 20));
    let controller = searched(&client, "test").await;

    controller.load_more();
    let state = controller.settled().await;

    assert_eq!(
        client.calls(),
        vec![("test".to_string(), 1), ("test".to_string(), 2)]
    );
    assert_eq!(state.results, articles(&[1]));
    assert_eq!(state.current_page, 1);
    assert_eq!(
        state.error.as_deref(),
        Some("Backend error: unexpected page 1 (requested page 2)")
    );
    assert!(state.loading.is_idle());
    assert!(state.can_load_more());
}

#[tokio::test(start_paused = true)]
async fn test_search_rejects_wrong_page() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[11], 2, 20));
    let controller = searched(&client, "test").await;
    let state = controller.state();

    assert!(state.results.is_empty());
    assert_eq!(state.current_page, 0);
    assert_eq!(
        state.error.as_deref(),
        Some("Backend error: unexpected page 2 (requested page 1)")
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_never_sets_error() {
    let client = Arc::new(ScriptedClient::new());
    client.push_err(ClientError::Cancelled);
    let controller = searched(&client, "test").await;
    let state = controller.state();

    assert_eq!(state.error, None);
    assert!(state.loading.is_idle());
    assert_eq!(state.query, "test");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_load_more_never_sets_error() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_err(ClientError::Cancelled);
    let controller = searched(&client, "test").await;

    controller.load_more();
    let state = controller.settled().await;

    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_cancels_in_flight_search() {
    let client = Arc::new(ScriptedClient::new());
    client.push(Scripted::delayed(
        Duration::from_millis(200),
        Scripted::Respond(page(&[1], 1, 1)),
    ));
    let controller = controller(&client);

    controller.search_with_delay("test", Duration::ZERO);
    advance(10).await;
    assert!(controller.state().is_searching());

    controller.clear();
    assert_eq!(controller.state(), SearchState::default());

    advance(1_000).await;
    assert_eq!(controller.state(), SearchState::default());
}

#[tokio::test(start_paused = true)]
async fn test_new_search_discards_in_flight_load_more() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push(Scripted::delayed(
        Duration::from_millis(500),
        Scripted::Respond(page(&[2], 2, 20)),
    ));
    client.push_ok(page(&[50], 1, 1));
    let controller = searched(&client, "old").await;

    controller.load_more();
    advance(10).await;
    assert_eq!(client.call_count(), 2);

    controller.search_with_delay("new", Duration::ZERO);
    advance(1_000).await;

    let state = controller.state();
    assert_eq!(state.query, "new");
    assert_eq!(state.results, articles(&[50]));
    assert_eq!(state.current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_observe_transitions() {
    let client = Arc::new(ScriptedClient::new());
    client.push(Scripted::delayed(
        Duration::from_millis(100),
        Scripted::Respond(page(&[1], 1, 1)),
    ));
    let controller = controller(&client);
    let mut updates = controller.subscribe();

    controller.search_with_delay("test", Duration::ZERO);

    updates.changed().await.unwrap();
    let searching = updates.borrow_and_update().clone();
    assert!(searching.is_searching());
    assert_eq!(searching.query, "test");

    updates.changed().await.unwrap();
    let done = updates.borrow_and_update().clone();
    assert!(done.loading.is_idle());
    assert_eq!(done.results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_react_search_reaches_end_of_results() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1, 2], 1, 2));
    let controller = searched(&client, "React").await;
    let state = controller.state();

    assert_eq!(state.results.len(), 2);
    assert!(!state.has_more());
    assert!(state.is_end_of_results());
}

#[tokio::test(start_paused = true)]
async fn test_paged_search_with_load_more() {
    let client = Arc::new(ScriptedClient::new());
    client.push_ok(page(&[1], 1, 20));
    client.push_ok(page(&[2], 2, 20));
    let controller = searched(&client, "test").await;
    assert!(controller.state().has_more());

    controller.load_more();
    let state = controller.settled().await;

    assert_eq!(state.results.len(), 2);
    assert_eq!(state.current_page, 2);
}

#[tokio::test(start_paused = true)]
async fn test_reference_backend_empty_query_marker() {
    let controller =
        SearchController::new(MockSearchClient::with_config(MockConfig::instant()), ControllerConfig::default())
            .unwrap();

    controller.search_with_delay("XYZ123", Duration::ZERO);
    let state = controller.settled().await;

    assert!(state.results.is_empty());
    assert_eq!(state.total, 0);
    assert!(state.is_empty_result());
}

#[tokio::test(start_paused = true)]
async fn test_reference_backend_pages_through_everything() {
    let controller =
        SearchController::new(MockSearchClient::with_config(MockConfig::instant()), ControllerConfig::default())
            .unwrap();

    controller.search_with_delay("Rust", Duration::ZERO);
    let mut state = controller.settled().await;
    while state.has_more() {
        controller.load_more();
        state = controller.settled().await;
    }

    assert_eq!(state.results.len(), 30);
    assert_eq!(state.current_page, 3);
    let ids: Vec<u64> = state.results.iter().map(|a| a.id).collect();
    assert_eq!(ids, (1..=30).collect::<Vec<u64>>());
}
