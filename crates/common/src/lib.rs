//! IdeaCenter Common Library
//!
//! Wire types and the HTTP contract shared by the contract harness and the
//! stub API used in its integration tests.

pub mod api;
pub mod types;

// Re-export commonly used types
pub use api::{messages, paths, IDEA_ID_PARAM, KNOWN_ABSENT_IDEA_ID};
pub use types::*;
