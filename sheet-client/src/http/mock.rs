//! Mock HTTP transport for testing.
//!
//! Allows queueing responses and capturing sent requests for verification.

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock HTTP transport for testing.
///
/// Clones share state, so a test can keep one handle while the client owns
/// another.
#[derive(Debug, Default)]
pub struct MockHttp {
    inner: Arc<Mutex<MockHttpInner>>,
}

#[derive(Debug, Default)]
struct MockHttpInner {
    requests: Vec<HttpRequest>,
    responses: VecDeque<HttpResponse>,
    fail_next_request: Option<String>,
}

impl MockHttp {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response for the next `execute()` call.
    pub fn queue_response(&self, status: u16, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(HttpResponse::new(status, body));
    }

    /// Queue a `200 OK` JSON response.
    pub fn queue_json(&self, body: Value) {
        self.queue_response(200, &body.to_string());
    }

    /// Get all requests that were executed.
    pub fn requests(&self) -> Vec<HttpRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the last request that was executed.
    pub fn last_request(&self) -> Option<HttpRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Number of requests executed so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Cause the next `execute()` to fail with the given error.
    pub fn fail_next_request(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_request = Some(error.to_string());
    }

    /// Clear all state (requests, queue, forced failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockHttpInner::default();
    }
}

impl Clone for MockHttp {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl HttpTransport for MockHttp {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);

        // Check for forced failure
        if let Some(error) = inner.fail_next_request.take() {
            return Err(TransportError::RequestFailed(error));
        }

        inner
            .responses
            .pop_front()
            .ok_or_else(|| TransportError::RequestFailed("no response queued".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheet_core::{CallBody, Method};

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            body: CallBody::Empty,
        }
    }

    // ===========================================
    // MockHttp Basic Tests
    // ===========================================

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let http = MockHttp::new();
        http.queue_json(json!({"success": true}));
        http.queue_response(500, "oops");

        let r1 = http.execute(request("http://a/1")).await.unwrap();
        let r2 = http.execute(request("http://a/2")).await.unwrap();

        assert_eq!(r1, HttpResponse::new(200, r#"{"success":true}"#));
        assert_eq!(r2, HttpResponse::new(500, "oops"));
    }

    #[tokio::test]
    async fn captures_requests() {
        let http = MockHttp::new();
        http.queue_response(200, "{}");

        http.execute(request("http://a/1")).await.unwrap();

        assert_eq!(http.request_count(), 1);
        assert_eq!(http.last_request().unwrap().url, "http://a/1");
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let http = MockHttp::new();
        let result = http.execute(request("http://a/1")).await;
        assert!(matches!(result, Err(TransportError::RequestFailed(_))));
    }

    // ===========================================
    // Error Condition Tests
    // ===========================================

    #[tokio::test]
    async fn forced_failure_applies_once() {
        let http = MockHttp::new();
        http.queue_response(200, "{}");
        http.fail_next_request("connection refused");

        let result = http.execute(request("http://a/1")).await;
        assert_eq!(
            result,
            Err(TransportError::RequestFailed("connection refused".into()))
        );

        // The queued response is still there
        assert!(http.execute(request("http://a/1")).await.is_ok());
        assert_eq!(http.request_count(), 2);
    }

    // ===========================================
    // Clone and Shared State Tests
    // ===========================================

    #[tokio::test]
    async fn clone_shares_state() {
        let http1 = MockHttp::new();
        let http2 = http1.clone();

        http1.queue_response(200, "{}");
        http2.execute(request("http://a/1")).await.unwrap();

        assert_eq!(http1.request_count(), 1);
    }

    #[tokio::test]
    async fn reset_clears_all() {
        let http = MockHttp::new();
        http.queue_response(200, "{}");
        http.execute(request("http://a/1")).await.unwrap();
        http.queue_response(200, "{}");
        http.fail_next_request("x");

        http.reset();

        assert_eq!(http.request_count(), 0);
        assert!(http.last_request().is_none());
        assert!(matches!(
            http.execute(request("http://a/1")).await,
            Err(TransportError::RequestFailed(msg)) if msg == "no response queued"
        ));
    }
}
