//! Search client trait

use std::sync::Arc;

use async_trait::async_trait;
use sift_core::SearchResponse;

pub use crate::error::{ClientError, ClientResult as Result};

/// A backend that returns one page of results per call
///
/// Dropping the returned future cancels the request. Implementations that
/// observe cancellation some other way report it as `ClientError::Cancelled`.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Fetch `page` (1-indexed) of the results for `query`
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse>;
}

#[async_trait]
impl<T: SearchClient + ?Sized> SearchClient for Arc<T> {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        (**self).search(query, page).await
    }
}
