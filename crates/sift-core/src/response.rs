//! Page types returned by a search backend

use crate::article::Article;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page size used by the reference backend
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The articles on this page, in backend order
    pub data: Vec<Article>,

    /// Page number (1-indexed)
    pub page: u32,

    /// Number of results per page for this deployment
    pub page_size: u32,

    /// Total number of results for the query
    pub total: u64,
}

impl SearchResponse {
    /// Build a page, rejecting page 0 and a zero page size
    pub fn new(data: Vec<Article>, page: u32, page_size: u32, total: u64) -> Result<Self> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Self {
            data,
            page,
            page_size,
            total,
        })
    }

    /// A page with no data and a total of zero
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            page,
            page_size,
            total: 0,
        }
    }

    /// Whether pages exist beyond this one
    pub fn has_more(&self) -> bool {
        has_more(self.page, self.page_size, self.total)
    }
}

/// `page * page_size < total`, computed without overflow
pub(crate) fn has_more(page: u32, page_size: u32, total: u64) -> bool {
    u64::from(page) * u64::from(page_size) < total
}

/// Pagination summary for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub loaded: usize,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    pub has_more: bool,
}

impl PageInfo {
    pub fn new(loaded: usize, page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size))
        };
        Self {
            loaded,
            total,
            page,
            total_pages,
            has_more: has_more(page, page_size, total),
        }
    }
}
