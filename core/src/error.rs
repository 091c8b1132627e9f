//! Error types for the item store client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because deleting or patching an item
//! another client already removed is the common failure. Other non-2xx
//! responses land in `HttpError` with the raw status and body. `Transport`
//! covers requests that never produced a response.
//!
//! `ApiError` is `Clone` so the controller can keep the most recent failure
//! in its state while also handing it back to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Whether the failure may go away if the same request is sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::HttpError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
