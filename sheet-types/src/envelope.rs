//! Envelope - the `{success, data, message, url}` shape every endpoint answers with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EnvelopeError, Rejected};

/// Maximum number of characters of a raw body quoted in diagnostics.
pub const EXCERPT_LEN: usize = 100;

/// The response envelope as it appears on the wire.
///
/// Only `success` is mandatory. Decoding goes through [`Envelope::parse`]
/// rather than plain serde so that a missing or non-boolean `success` is
/// reported precisely instead of being read as `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable server message, usually set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// URL of an uploaded file (upload endpoint only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Envelope {
    /// Parse a raw response body.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        if body.trim().is_empty() {
            return Err(EnvelopeError::Empty);
        }

        let value: Value = serde_json::from_str(body).map_err(|_| EnvelopeError::InvalidJson {
            excerpt: excerpt(body, EXCERPT_LEN),
        })?;

        let Value::Object(mut map) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let success = match map.remove("success") {
            None => return Err(EnvelopeError::MissingSuccess),
            Some(Value::Bool(b)) => b,
            Some(other) => return Err(EnvelopeError::InvalidSuccess(other.to_string())),
        };

        // Servers occasionally send non-string messages; keep their JSON text.
        let message = match map.remove("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        let url = match map.remove("url") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        Ok(Self {
            success,
            data: map.remove("data"),
            message,
            url,
        })
    }
}

/// A decoded envelope: either the payload or the server's complaint.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `success: true`.
    Success {
        /// The `data` field (`null` when absent).
        data: Value,
        /// The `url` field, set by the upload endpoint.
        url: Option<String>,
    },
    /// `success: false`.
    Failure {
        /// Server message; empty strings are treated as absent.
        message: Option<String>,
    },
}

impl Reply {
    /// Decode a raw response body into a reply.
    pub fn decode(body: &str) -> Result<Self, EnvelopeError> {
        Envelope::parse(body).map(Self::from)
    }

    /// Check for `success: true`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Unwrap the `data` payload, or reject with the server message / `fallback`.
    pub fn into_data(self, fallback: &str) -> Result<Value, Rejected> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { message } => Err(Rejected {
                message: message.unwrap_or_else(|| fallback.to_string()),
            }),
        }
    }

    /// Unwrap the `url` field of a successful reply.
    ///
    /// Returns `Ok(None)` when the server reported success without a URL.
    pub fn into_url(self, fallback: &str) -> Result<Option<String>, Rejected> {
        match self {
            Self::Success { url, .. } => Ok(url),
            Self::Failure { message } => Err(Rejected {
                message: message.unwrap_or_else(|| fallback.to_string()),
            }),
        }
    }
}

impl From<Envelope> for Reply {
    fn from(envelope: Envelope) -> Self {
        if envelope.success {
            Self::Success {
                data: envelope.data.unwrap_or(Value::Null),
                url: envelope.url,
            }
        } else {
            Self::Failure {
                message: envelope.message.filter(|m| !m.is_empty()),
            }
        }
    }
}

/// Take at most `max_chars` characters from `raw`, never splitting a code point.
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}
