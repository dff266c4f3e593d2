//! Article (search hit) type

use serde::{Deserialize, Serialize};

/// Backend identifier for an article
pub type ArticleId = u64;

/// A single search result as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
}

impl Article {
    pub fn new(id: ArticleId, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            summary: summary.into(),
        }
    }
}
