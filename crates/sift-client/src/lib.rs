//! Sift Client - Search backends for the Sift controller
//!
//! Defines the `SearchClient` contract (one page per call, may fail
//! transiently) and ships a simulated reference backend plus a scripted
//! client for tests.

pub mod error;
pub mod mock;
pub mod scripted;
pub mod traits;

pub use error::{ClientError, ClientResult};
pub use mock::{MockConfig, MockSearchClient};
pub use scripted::{Scripted, ScriptedClient};
pub use traits::SearchClient;
