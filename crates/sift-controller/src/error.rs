//! Controller error types

use thiserror::Error;

/// Result type alias for controller construction
pub type ControllerResult<T> = std::result::Result<T, ControllerError>;

/// Errors raised while building a controller. Search operations themselves
/// never fail; their failures land in `SearchState::error`.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("No Tokio runtime available; create the controller inside a runtime")]
    NoRuntime,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
