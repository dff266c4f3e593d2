//! Simulated backend with network latency and occasional failures

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::traits::{Result, SearchClient};
use sift_core::{Article, SearchResponse, DEFAULT_PAGE_SIZE};

/// Queries containing this marker (any case) match nothing
const NO_RESULTS_MARKER: &str = "xyz123";

/// Tuning for [`MockSearchClient`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Results available for every query
    pub total: u64,
    pub page_size: u32,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Probability (0.0-1.0) that a call fails with a network error
    pub failure_rate: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            total: 30,
            page_size: DEFAULT_PAGE_SIZE,
            min_latency_ms: 300,
            max_latency_ms: 500,
            failure_rate: 0.05,
        }
    }
}

impl MockConfig {
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        self.min_latency_ms = min.as_millis() as u64;
        self.max_latency_ms = (max.as_millis() as u64).max(self.min_latency_ms);
        self
    }

    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// No latency and no failures
    pub fn instant() -> Self {
        Self::default()
            .with_latency(Duration::ZERO, Duration::ZERO)
            .with_failure_rate(0.0)
    }
}

/// Article backend that fabricates results for any query
pub struct MockSearchClient {
    config: MockConfig,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Latency and failure outcome for one call
    fn roll(&self) -> (Duration, bool) {
        let mut rng = rand::rng();
        let min = self.config.min_latency_ms;
        let max = self.config.max_latency_ms.max(min);
        let latency = if max > min {
            rng.random_range(min..=max)
        } else {
            min
        };
        let fail = self.config.failure_rate > 0.0 && rng.random::<f64>() < self.config.failure_rate;
        (Duration::from_millis(latency), fail)
    }

    fn generate(&self, query: &str, page: u32) -> Result<SearchResponse> {
        let page_size = self.config.page_size.max(1);
        let total = self.config.total;
        let start = u64::from(page - 1) * u64::from(page_size) + 1;
        let topic = if query.is_empty() { "technology" } else { query };

        let data = (start..start + u64::from(page_size))
            .take_while(|id| *id <= total)
            .map(|id| {
                let title = if query.is_empty() {
                    format!("Article {}: Advanced Techniques", id)
                } else {
                    format!("{} - Article {}: Advanced Techniques", query, id)
                };
                let summary = format!(
                    "This is a comprehensive summary of article {} about {}. It covers various \
                     aspects including implementation details, best practices, and real-world \
                     applications. The content is designed to be informative and engaging for \
                     readers interested in learning more about this topic.",
                    id, topic
                );
                Article::new(id, title, summary)
            })
            .collect();

        Ok(SearchResponse::new(data, page, page_size, total)?)
    }
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        if page == 0 {
            return Err(ClientError::InvalidPage(page));
        }

        let (latency, fail) = self.roll();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if fail {
            tracing::debug!(query, page, "Simulated network failure");
            return Err(ClientError::Network("Failed to fetch articles".to_string()));
        }

        if query.to_lowercase().contains(NO_RESULTS_MARKER) {
            return Ok(SearchResponse::empty(page, self.config.page_size.max(1)));
        }

        self.generate(query, page)
    }
}
