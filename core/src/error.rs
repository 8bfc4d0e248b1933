//! Error types for the JSON middleware and its hook pipeline.
//!
//! # Design
//! Only two failures originate in the middleware itself: a structured
//! request body that cannot be encoded, and a response body that is not
//! valid JSON. `Decode` and `Transport` cover the collaborators the
//! middleware leans on (text retrieval and the caller's I/O).

use thiserror::Error;

/// Errors surfaced by hooks, `json()` and the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A structured request body could not be serialized to JSON. The
    /// request is aborted before transmission.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body is not valid JSON.
    #[error("JSON parse failed: {0}")]
    Parse(#[source] serde_json::Error),

    /// The response body is not valid UTF-8 text.
    #[error("response body is not UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The caller's transport failed to complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}
