//! Sift Core - Data model for paginated, debounced search
//!
//! This crate provides the article and page types returned by a search
//! backend, plus the `SearchState` reducer that every controller transition
//! goes through. Nothing in here touches a runtime or a clock.

pub mod article;
pub mod error;
pub mod response;
pub mod state;

pub use article::{Article, ArticleId};
pub use error::{Error, Result};
pub use response::{PageInfo, SearchResponse, DEFAULT_PAGE_SIZE};
pub use state::{LoadingState, SearchEvent, SearchState};
