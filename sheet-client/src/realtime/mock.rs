//! Mock realtime transport for testing.
//!
//! Records opens, emits and closes, and lets tests play the server side:
//! confirm the connection, drop it, or push inbound events.

use super::{RealtimeError, RealtimeTransport, SignalHandler, TransportSignal};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Mock realtime transport for testing.
#[derive(Default)]
pub struct MockSocket {
    inner: Arc<Mutex<MockSocketInner>>,
}

#[derive(Default)]
struct MockSocketInner {
    open: bool,
    open_count: usize,
    close_count: usize,
    opened_url: Option<String>,
    opened_auth: Option<Value>,
    emitted: Vec<(String, Value)>,
    handler: Option<SignalHandler>,
    defer_connect: bool,
    fail_next_open: Option<String>,
    fail_next_emit: Option<String>,
}

impl MockSocket {
    /// Create a mock that connects as soon as it is opened.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the next opens unconfirmed until [`simulate_connect`](Self::simulate_connect).
    pub fn defer_connect(&self) {
        self.inner.lock().unwrap().defer_connect = true;
    }

    /// Cause the next `open()` to fail with the given error.
    pub fn fail_next_open(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_open = Some(error.to_string());
    }

    /// Cause the next `emit()` to fail with the given error.
    pub fn fail_next_emit(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_emit = Some(error.to_string());
    }

    /// Server confirms the handshake.
    pub fn simulate_connect(&self) {
        self.signal(TransportSignal::Connected);
    }

    /// Connection lost.
    pub fn simulate_drop(&self, reason: &str) {
        self.inner.lock().unwrap().open = false;
        self.signal(TransportSignal::Disconnected {
            reason: reason.to_string(),
        });
    }

    /// Server pushes an event.
    pub fn simulate_event(&self, name: &str, payload: Value) {
        self.signal(TransportSignal::Event {
            name: name.to_string(),
            payload,
        });
    }

    /// Whether the mock currently considers itself open.
    pub fn is_open(&self) -> bool {
        self.inner.lock().unwrap().open
    }

    /// Number of `open()` calls that reached the mock.
    pub fn open_count(&self) -> usize {
        self.inner.lock().unwrap().open_count
    }

    /// Number of `close()` calls that reached the mock.
    pub fn close_count(&self) -> usize {
        self.inner.lock().unwrap().close_count
    }

    /// URL passed to the last `open()`.
    pub fn opened_url(&self) -> Option<String> {
        self.inner.lock().unwrap().opened_url.clone()
    }

    /// Auth payload passed to the last `open()`.
    pub fn opened_auth(&self) -> Option<Value> {
        self.inner.lock().unwrap().opened_auth.clone()
    }

    /// Every event sent, in order.
    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.inner.lock().unwrap().emitted.clone()
    }

    // The handler may call back into the channel; never hold our lock while
    // it runs.
    fn signal(&self, signal: TransportSignal) {
        let handler = self.inner.lock().unwrap().handler.clone();
        if let Some(handler) = handler {
            handler(signal);
        }
    }
}

impl Clone for MockSocket {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RealtimeTransport for MockSocket {
    async fn open(
        &self,
        url: &str,
        auth: Value,
        handler: SignalHandler,
    ) -> Result<(), RealtimeError> {
        let defer = {
            let mut inner = self.inner.lock().unwrap();
            inner.open_count += 1;

            if let Some(error) = inner.fail_next_open.take() {
                return Err(RealtimeError::ConnectionFailed(error));
            }

            inner.open = true;
            inner.opened_url = Some(url.to_string());
            inner.opened_auth = Some(auth);
            inner.handler = Some(handler);
            inner.defer_connect
        };

        if !defer {
            self.simulate_connect();
        }
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), RealtimeError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_emit.take() {
            return Err(RealtimeError::EmitFailed(error));
        }
        inner.emitted.push((event.to_string(), payload));
        Ok(())
    }

    async fn close(&self) -> Result<(), RealtimeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.close_count += 1;
        inner.open = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder() -> (SignalHandler, Arc<Mutex<Vec<TransportSignal>>>) {
        let seen: Arc<Mutex<Vec<TransportSignal>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let handler: SignalHandler = Arc::new(move |s| sink.lock().unwrap().push(s));
        (handler, seen)
    }

    #[tokio::test]
    async fn open_confirms_immediately_by_default() {
        let socket = MockSocket::new();
        let (handler, seen) = recorder();

        socket.open("http://x", json!({}), handler).await.unwrap();

        assert!(socket.is_open());
        assert_eq!(*seen.lock().unwrap(), vec![TransportSignal::Connected]);
    }

    #[tokio::test]
    async fn deferred_open_waits_for_simulate_connect() {
        let socket = MockSocket::new();
        socket.defer_connect();
        let (handler, seen) = recorder();

        socket.open("http://x", json!({}), handler).await.unwrap();
        assert!(seen.lock().unwrap().is_empty());

        socket.simulate_connect();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn forced_open_failure() {
        let socket = MockSocket::new();
        socket.fail_next_open("refused");
        let (handler, seen) = recorder();

        let result = socket.open("http://x", json!({}), handler).await;

        assert_eq!(result, Err(RealtimeError::ConnectionFailed("refused".into())));
        assert!(!socket.is_open());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn forced_emit_failure_applies_once() {
        let socket = MockSocket::new();
        socket.fail_next_emit("buffer full");

        assert!(socket.emit("a", json!(1)).await.is_err());
        socket.emit("a", json!(2)).await.unwrap();

        assert_eq!(socket.emitted(), vec![("a".to_string(), json!(2))]);
    }

    #[tokio::test]
    async fn drop_marks_closed_and_signals() {
        let socket = MockSocket::new();
        let (handler, seen) = recorder();
        socket.open("http://x", json!({}), handler).await.unwrap();

        socket.simulate_drop("ping timeout");

        assert!(!socket.is_open());
        assert_eq!(
            seen.lock().unwrap().last(),
            Some(&TransportSignal::Disconnected {
                reason: "ping timeout".into()
            })
        );
    }

    #[test]
    fn signals_without_handler_are_ignored() {
        let socket = MockSocket::new();
        socket.simulate_event("chat", json!(null));
        assert_eq!(socket.open_count(), 0);
    }
}
