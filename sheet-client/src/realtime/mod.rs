//! Realtime channel over Socket.IO.
//!
//! [`RealtimeChannel`] drives the pure [`ChannelState`](sheet_core::ChannelState)
//! machine and performs the I/O through a [`RealtimeTransport`]. Transports
//! report what happens on the wire as [`TransportSignal`]s to a
//! [`SignalHandler`] handed to them on `open`.

mod channel;
mod mock;
mod socketio;

pub use channel::{MessageHandler, RealtimeChannel, RealtimeConfig, DEFAULT_REALTIME_URL};
pub use mock::MockSocket;
pub use socketio::SocketIoTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Realtime errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// No access key was supplied.
    #[error("access key is required to open the realtime channel")]
    MissingAccessKey,

    /// The connection could not be opened.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// An outbound event could not be sent.
    #[error("emit failed: {0}")]
    EmitFailed(String),

    /// Closing the connection failed.
    #[error("close failed: {0}")]
    CloseFailed(String),
}

/// Something the transport observed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportSignal {
    /// Handshake finished.
    Connected,
    /// The connection went away.
    Disconnected {
        /// Reason reported by the transport.
        reason: String,
    },
    /// An inbound event.
    Event {
        /// Event name.
        name: String,
        /// Event payload.
        payload: Value,
    },
}

/// Receives transport signals. Called from the transport's own tasks.
pub type SignalHandler = Arc<dyn Fn(TransportSignal) + Send + Sync>;

/// A realtime connection.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Open the connection, authenticating with `auth`.
    ///
    /// Returns once the connection attempt has completed or failed.
    async fn open(&self, url: &str, auth: Value, handler: SignalHandler)
        -> Result<(), RealtimeError>;

    /// Send one event.
    async fn emit(&self, event: &str, payload: Value) -> Result<(), RealtimeError>;

    /// Close the connection. Closing a closed transport is not an error.
    async fn close(&self) -> Result<(), RealtimeError>;
}
