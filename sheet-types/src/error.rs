//! Error types for envelope decoding.

use thiserror::Error;

/// Errors raised while turning a raw response body into a [`crate::Reply`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Body was empty or whitespace only.
    #[error("empty response from server")]
    Empty,

    /// Body was not valid JSON.
    #[error("invalid JSON response from server: {excerpt}")]
    InvalidJson {
        /// Leading slice of the raw body, for diagnostics.
        excerpt: String,
    },

    /// Body was JSON but not an object.
    #[error("response envelope is not a JSON object")]
    NotAnObject,

    /// The `success` field is absent.
    #[error("response envelope has no `success` field")]
    MissingSuccess,

    /// The `success` field is present but not a boolean.
    #[error("`success` must be a boolean, got {0}")]
    InvalidSuccess(String),
}

/// The server answered with `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejected {
    /// Server-supplied message, or the operation's fallback.
    pub message: String,
}
