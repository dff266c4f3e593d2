//! Error types for Sift Core

use thiserror::Error;

/// Result type alias using Sift's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Sift core error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid page number: {0} (pages are 1-indexed)")]
    InvalidPage(u32),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),
}
