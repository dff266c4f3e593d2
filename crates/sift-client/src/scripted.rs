//! Scripted client that replays canned outcomes

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ClientError;
use crate::traits::{Result, SearchClient};
use sift_core::SearchResponse;

/// One canned outcome
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(SearchResponse),
    Fail(ClientError),
    /// Wait, then resolve the inner outcome
    Delayed(Duration, Box<Scripted>),
    /// Never resolves
    Pending,
}

impl Scripted {
    pub fn delayed(delay: Duration, outcome: Scripted) -> Self {
        Self::Delayed(delay, Box::new(outcome))
    }
}

/// A `SearchClient` that answers from a queue and records every call
///
/// Queued outcomes are consumed in order. Once the queue is empty the
/// fallback (if any) answers every further call.
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<Scripted>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue an outcome for the next unanswered call
    pub fn push(&self, outcome: Scripted) -> &Self {
        self.queue.lock().push_back(outcome);
        self
    }

    pub fn push_ok(&self, response: SearchResponse) -> &Self {
        self.push(Scripted::Respond(response))
    }

    pub fn push_err(&self, err: ClientError) -> &Self {
        self.push(Scripted::Fail(err))
    }

    pub fn push_pending(&self) -> &Self {
        self.push(Scripted::Pending)
    }

    /// Answer every call not covered by the queue with `outcome`
    pub fn always(&self, outcome: Scripted) -> &Self {
        *self.fallback.lock() = Some(outcome);
        self
    }

    /// `(query, page)` for every call so far, in call order
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_outcome(&self) -> Option<Scripted> {
        if let Some(outcome) = self.queue.lock().pop_front() {
            return Some(outcome);
        }
        self.fallback.lock().clone()
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for ScriptedClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        self.calls.lock().push((query.to_string(), page));

        let mut outcome = match self.next_outcome() {
            Some(outcome) => outcome,
            None => {
                return Err(ClientError::Backend(format!(
                    "No scripted response for '{}' page {}",
                    query, page
                )))
            }
        };

        loop {
            match outcome {
                Scripted::Respond(response) => return Ok(response),
                Scripted::Fail(err) => return Err(err),
                Scripted::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    outcome = *inner;
                }
                Scripted::Pending => return std::future::pending().await,
            }
        }
    }
}
