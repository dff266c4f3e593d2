//! Client error types

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Ways a page fetch can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The caller no longer wants this page. Never shown to users.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid page number: {0}")]
    InvalidPage(u32),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<sift_core::Error> for ClientError {
    fn from(err: sift_core::Error) -> Self {
        match err {
            sift_core::Error::InvalidPage(page) => Self::InvalidPage(page),
            other => Self::Backend(other.to_string()),
        }
    }
}
