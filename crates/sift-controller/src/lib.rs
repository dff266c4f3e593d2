//! Sift Controller - Search state orchestration
//!
//! Owns a `SearchState`, debounces keystroke-driven searches, cancels
//! superseded requests and accumulates pages on `load_more`.

pub mod config;
pub mod controller;
pub mod error;

pub use config::{ControllerConfig, DEFAULT_DEBOUNCE_MS, MAX_DEBOUNCE_MS};
pub use controller::{ControllerPhase, SearchController};
pub use error::{ControllerError, ControllerResult};
