//! The caller-owned realtime channel.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use sheet_core::{Action, ChannelEvent, ChannelState, Event};
use sheet_types::AccessKey;
use tracing::{debug, info, warn};

use super::{RealtimeError, RealtimeTransport, SignalHandler, TransportSignal};

/// Realtime host used when none is configured.
pub const DEFAULT_REALTIME_URL: &str = "http://74.208.13.213:3000";

/// Receives `(event name, payload)` for every subscribed event.
pub type MessageHandler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Configuration for [`RealtimeChannel::init`].
#[derive(Clone)]
pub struct RealtimeConfig {
    /// Socket.IO server URL.
    pub url: String,
    /// Access key sent in the auth payload. Required.
    pub access_key: AccessKey,
    /// User id sent in the auth payload.
    pub user_id: Option<String>,
    /// Event names to forward to `on_message`.
    pub event_names: Vec<String>,
    /// Callback for subscribed events.
    pub on_message: Option<MessageHandler>,
}

impl RealtimeConfig {
    /// Configuration for the default host with no subscriptions.
    pub fn new(access_key: impl Into<AccessKey>) -> Self {
        Self {
            url: DEFAULT_REALTIME_URL.to_string(),
            access_key: access_key.into(),
            user_id: None,
            event_names: Vec::new(),
            on_message: None,
        }
    }

    /// Connect to a different host.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Identify as a user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Subscribe to an event name.
    pub fn subscribe(mut self, event: impl Into<String>) -> Self {
        self.event_names.push(event.into());
        self
    }

    /// Set the message callback.
    pub fn on_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.on_message = Some(Arc::new(handler));
        self
    }

    fn auth(&self) -> Value {
        json!({
            "accessKey": self.access_key.as_str(),
            "userId": self.user_id,
        })
    }
}

impl fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("url", &self.url)
            .field("access_key", &self.access_key)
            .field("user_id", &self.user_id)
            .field("event_names", &self.event_names)
            .field("on_message", &self.on_message.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// State shared with the transport's signal handler.
struct Shared {
    state: Mutex<ChannelState>,
    events: HashSet<String>,
    on_message: Option<MessageHandler>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> ChannelState {
        self.lock().clone()
    }

    /// Feed an event through the state machine and run the non-I/O actions.
    fn apply(&self, event: Event) -> Vec<Action> {
        let actions = {
            let mut state = self.lock();
            let (next, actions) = std::mem::take(&mut *state).on_event(event);
            *state = next;
            actions
        };

        for action in &actions {
            match action {
                Action::Subscribe => debug!(events = ?self.events, "subscriptions active"),
                Action::EmitEvent(ChannelEvent::Connected) => info!("realtime connected"),
                Action::EmitEvent(ChannelEvent::ConnectionFailed { error }) => {
                    warn!(%error, "realtime connection failed")
                }
                Action::EmitEvent(ChannelEvent::Disconnected { reason }) => {
                    info!(%reason, "realtime disconnected")
                }
                Action::Open | Action::Close => {}
            }
        }
        actions
    }

    fn on_signal(&self, signal: TransportSignal) {
        match signal {
            TransportSignal::Connected => {
                self.apply(Event::ConnectSucceeded);
            }
            TransportSignal::Disconnected { reason } => {
                self.apply(Event::Dropped { reason });
            }
            TransportSignal::Event { name, payload } => {
                debug!(event = %name, ?payload, "inbound event");
                if !self.lock().is_connected() || !self.events.contains(&name) {
                    return;
                }
                if let Some(handler) = &self.on_message {
                    handler(&name, &payload);
                }
            }
        }
    }
}

/// One realtime connection, owned by the caller.
///
/// There is no reconnect: once the connection drops or is closed, build a
/// new channel with [`init`](Self::init). Call [`disconnect`](Self::disconnect)
/// before dropping; `Drop` does not close the transport.
pub struct RealtimeChannel<T: RealtimeTransport> {
    transport: T,
    shared: Arc<Shared>,
    // Set while the transport holds a client, including after a drop.
    held: AtomicBool,
}

impl<T: RealtimeTransport> RealtimeChannel<T> {
    /// Open a channel.
    ///
    /// Fails without touching the transport if the access key is blank.
    pub async fn init(config: RealtimeConfig, transport: T) -> Result<Self, RealtimeError> {
        if config.access_key.is_empty() {
            return Err(RealtimeError::MissingAccessKey);
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(ChannelState::new()),
            events: config.event_names.iter().cloned().collect(),
            on_message: config.on_message.clone(),
        });
        shared.apply(Event::ConnectRequested);

        let handler: SignalHandler = {
            let shared = Arc::clone(&shared);
            Arc::new(move |signal| shared.on_signal(signal))
        };

        debug!(url = %config.url, "opening realtime channel");
        if let Err(err) = transport.open(&config.url, config.auth(), handler).await {
            shared.apply(Event::ConnectFailed {
                error: err.to_string(),
            });
            return Err(err);
        }

        Ok(Self {
            transport,
            shared,
            held: AtomicBool::new(true),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        self.shared.state()
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Send an event. When not connected this only logs a warning.
    pub async fn emit(&self, event: &str, payload: Value) -> Result<(), RealtimeError> {
        if !self.is_connected() {
            warn!(%event, "realtime channel not connected, event dropped");
            return Ok(());
        }
        self.transport.emit(event, payload).await
    }

    /// Close the connection. Safe to call more than once.
    ///
    /// Also releases the transport after the server dropped the connection.
    pub async fn disconnect(&self) -> Result<(), RealtimeError> {
        self.shared.apply(Event::DisconnectRequested);
        if self.held.swap(false, Ordering::SeqCst) {
            self.transport.close().await?;
        }
        Ok(())
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
