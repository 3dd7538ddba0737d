//! Typed models for the files and environments handed to remote hosts.
//!
//! Values never get spliced into a template by hand: each model has a
//! renderer that owns escaping for its target format.

use thiserror::Error;

pub mod ecosystem;
pub mod group;
pub mod hook;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize {what}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} value {value:?} must be a single non-empty word")]
    InvalidToken { field: &'static str, value: String },
}
