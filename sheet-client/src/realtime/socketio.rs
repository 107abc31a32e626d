//! Socket.IO transport over `rust_socketio`.
//!
//! Websocket transport only (no long-polling fallback) and the library's
//! own reconnect loop is switched off: a dropped connection is reported
//! once and stays dropped.

use async_trait::async_trait;
use futures_util::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event as SocketEvent, Payload, TransportType};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{RealtimeError, RealtimeTransport, SignalHandler, TransportSignal};

/// Realtime transport backed by a `rust_socketio` async client.
#[derive(Default)]
pub struct SocketIoTransport {
    client: Mutex<Option<Client>>,
}

impl SocketIoTransport {
    /// Create an unopened transport.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Flatten a Socket.IO payload into one JSON value.
///
/// Only the first argument is kept, as a JavaScript `(data) => ...` listener
/// would see it; no arguments yields `null`. Binary payloads become an array
/// of byte values.
#[allow(deprecated)]
fn payload_to_value(payload: Payload) -> Value {
    match payload {
        Payload::Text(values) => values.into_iter().next().unwrap_or(Value::Null),
        Payload::Binary(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
        // Deprecated plain-string variant.
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

fn event_name(event: SocketEvent) -> Option<String> {
    match event {
        SocketEvent::Custom(name) => Some(name),
        SocketEvent::Message => Some("message".to_string()),
        _ => None,
    }
}

fn reason_text(payload: Payload) -> String {
    match payload_to_value(payload) {
        Value::String(text) => text,
        Value::Null => "transport close".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RealtimeTransport for SocketIoTransport {
    async fn open(
        &self,
        url: &str,
        auth: Value,
        handler: SignalHandler,
    ) -> Result<(), RealtimeError> {
        let on_connect = handler.clone();
        let on_any = handler.clone();
        let on_close = handler.clone();

        let client = ClientBuilder::new(url)
            .transport_type(TransportType::Websocket)
            .auth(auth)
            .reconnect(false)
            .on(SocketEvent::Connect, move |_payload: Payload, _socket: Client| {
                let handler = on_connect.clone();
                async move { handler(TransportSignal::Connected) }.boxed()
            })
            .on_any(
                move |event: SocketEvent, payload: Payload, _socket: Client| {
                    let handler = on_any.clone();
                    async move {
                        if let Some(name) = event_name(event) {
                            handler(TransportSignal::Event {
                                name,
                                payload: payload_to_value(payload),
                            });
                        }
                    }
                    .boxed()
                },
            )
            .on(SocketEvent::Close, move |payload: Payload, _socket: Client| {
                let handler = on_close.clone();
                async move {
                    handler(TransportSignal::Disconnected {
                        reason: reason_text(payload),
                    })
                }
                .boxed()
            })
            .on(SocketEvent::Error, |payload: Payload, _socket: Client| {
                async move { warn!(error = %reason_text(payload), "socket.io error") }.boxed()
            })
            .connect()
            .await
            .map_err(|e| RealtimeError::ConnectionFailed(e.to_string()))?;

        debug!(%url, "socket.io connected");
        *self.client.lock().await = Some(client);

        // The connect callback may already have fired; the state machine
        // ignores the duplicate.
        handler(TransportSignal::Connected);
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), RealtimeError> {
        let client = self
            .client
            .lock()
            .await
            .clone()
            .ok_or_else(|| RealtimeError::EmitFailed("not connected".into()))?;

        client
            .emit(event, payload)
            .await
            .map_err(|e| RealtimeError::EmitFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), RealtimeError> {
        let Some(client) = self.client.lock().await.take() else {
            return Ok(());
        };
        client
            .disconnect()
            .await
            .map_err(|e| RealtimeError::CloseFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_text_argument_is_unwrapped() {
        let value = payload_to_value(Payload::Text(vec![json!({"a": 1})]));
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let value = payload_to_value(Payload::Text(vec![json!(1), json!("two")]));
        assert_eq!(value, json!(1));
    }

    #[test]
    fn no_arguments_is_null() {
        assert_eq!(payload_to_value(Payload::Text(vec![])), Value::Null);
    }

    #[test]
    fn binary_becomes_byte_array() {
        let value = payload_to_value(Payload::Binary(vec![1u8, 255].into()));
        assert_eq!(value, json!([1, 255]));
    }

    #[test]
    fn only_named_events_are_forwarded() {
        assert_eq!(
            event_name(SocketEvent::Custom("chat".into())),
            Some("chat".to_string())
        );
        assert_eq!(event_name(SocketEvent::Message), Some("message".to_string()));
        assert_eq!(event_name(SocketEvent::Connect), None);
        assert_eq!(event_name(SocketEvent::Close), None);
    }

    #[test]
    fn close_reason_prefers_text() {
        assert_eq!(
            reason_text(Payload::Text(vec![json!("ping timeout")])),
            "ping timeout"
        );
        assert_eq!(reason_text(Payload::Text(vec![json!(null)])), "transport close");
    }

    #[tokio::test]
    async fn emit_before_open_fails() {
        let transport = SocketIoTransport::new();
        assert!(matches!(
            transport.emit("chat", json!(1)).await,
            Err(RealtimeError::EmitFailed(_))
        ));
    }

    #[tokio::test]
    async fn close_before_open_is_ok() {
        let transport = SocketIoTransport::new();
        transport.close().await.unwrap();
    }
}
