//! HTTP transport abstraction.
//!
//! [`SheetClient`](crate::SheetClient) compiles every operation to an
//! [`ApiCall`] and hands the resulting [`HttpRequest`] to an
//! [`HttpTransport`]. The transport only moves bytes; envelope decoding
//! happens in the client.
//!
//! # Design
//!
//! - `execute()` issues exactly one request and returns the status and the
//!   body as text. There is no retry and no timeout at this layer.
//! - Non-2xx statuses are returned as responses, not errors: the backend
//!   still answers with an envelope.
//!
//! # Example
//!
//! ```ignore
//! let http = MockHttp::new();
//! http.queue_json(json!({"success": true, "data": []}));
//! let response = http.execute(request).await?;
//! ```

mod mock;
mod reqwest;

pub use self::mock::MockHttp;
pub use self::reqwest::ReqwestTransport;

use ::reqwest::Url;
use async_trait::async_trait;
use sheet_core::{ApiCall, CallBody, Method};
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The base URL could not be combined with the request path.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    ReadFailed(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Request body.
    pub body: CallBody,
}

/// What came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Build a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP request per call.
///
/// Implementations must send any session cookies they hold.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute the request.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Join `call` onto `base_url`, percent-encoding path segments and query pairs.
pub fn build_url(base_url: &str, call: &ApiCall) -> Result<String, TransportError> {
    let mut url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(format!("{} cannot be a base", base_url)))?;
        path.pop_if_empty();
        path.extend(call.segments.iter());
    }

    if !call.query.is_empty() {
        url.query_pairs_mut().extend_pairs(call.query.iter());
    }

    Ok(url.into())
}
