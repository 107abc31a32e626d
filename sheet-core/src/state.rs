//! Realtime connection state machine.
//!
//! This module provides a pure, side-effect-free state machine for the
//! realtime channel lifecycle. The state machine takes events as input and
//! produces a new state plus a list of actions to execute.
//!
//! The actual I/O (opening the socket, closing it, forwarding events) is
//! performed by sheet-client. There is no reconnecting state:
//! a dropped connection stays dropped until the caller builds a new channel.

/// Connection state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelState {
    /// No live connection.
    #[default]
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Connected; subscriptions are active.
    Connected,
}

impl ChannelState {
    /// Create a new state machine in the Disconnected state.
    pub fn new() -> Self {
        Self::Disconnected
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sheet-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // From Disconnected
            (Self::Disconnected, Event::ConnectRequested) => (Self::Connecting, vec![Action::Open]),

            // From Connecting
            (Self::Connecting, Event::ConnectSucceeded) => (
                Self::Connected,
                vec![
                    Action::Subscribe,
                    Action::EmitEvent(ChannelEvent::Connected),
                ],
            ),
            (Self::Connecting, Event::ConnectFailed { error }) => (
                Self::Disconnected,
                vec![Action::EmitEvent(ChannelEvent::ConnectionFailed { error })],
            ),
            (Self::Connecting, Event::Dropped { reason }) => (
                Self::Disconnected,
                vec![Action::EmitEvent(ChannelEvent::ConnectionFailed {
                    error: reason,
                })],
            ),
            (Self::Connecting, Event::DisconnectRequested) => {
                (Self::Disconnected, vec![Action::Close])
            }

            // From Connected
            (Self::Connected, Event::Dropped { reason }) => (
                Self::Disconnected,
                vec![Action::EmitEvent(ChannelEvent::Disconnected { reason })],
            ),
            (Self::Connected, Event::DisconnectRequested) => (
                Self::Disconnected,
                vec![
                    Action::Close,
                    Action::EmitEvent(ChannelEvent::Disconnected {
                        reason: "client requested".into(),
                    }),
                ],
            ),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if a connection attempt is in flight.
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }
}

/// Events that can occur in the connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Caller asked for a connection.
    ConnectRequested,
    /// Transport finished connecting.
    ConnectSucceeded,
    /// Transport could not connect.
    ConnectFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// Transport-level drop.
    Dropped {
        /// Reason reported by the transport.
        reason: String,
    },
    /// Caller asked to disconnect.
    DisconnectRequested,
}

/// Actions to be executed by the sheet-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the transport connection.
    Open,
    /// Close the transport connection.
    Close,
    /// Activate the caller's event subscriptions.
    Subscribe,
    /// Report a lifecycle change to the application.
    EmitEvent(ChannelEvent),
}

/// Lifecycle notifications for the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Successfully connected.
    Connected,
    /// Connection attempt failed.
    ConnectionFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// Connection closed or lost.
    Disconnected {
        /// Reason for disconnection.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let state = ChannelState::new();
        assert!(matches!(state, ChannelState::Disconnected));
    }

    #[test]
    fn connect_request_transitions_to_connecting() {
        let state = ChannelState::Disconnected;
        let (new_state, actions) = state.on_event(Event::ConnectRequested);

        assert!(matches!(new_state, ChannelState::Connecting));
        assert_eq!(actions, vec![Action::Open]);
    }

    #[test]
    fn connect_success_subscribes() {
        let state = ChannelState::Connecting;
        let (new_state, actions) = state.on_event(Event::ConnectSucceeded);

        assert!(new_state.is_connected());
        assert!(actions.iter().any(|a| matches!(a, Action::Subscribe)));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::EmitEvent(ChannelEvent::Connected))));
    }

    #[test]
    fn connect_failure_returns_to_disconnected_without_retry() {
        let state = ChannelState::Connecting;
        let (new_state, actions) = state.on_event(Event::ConnectFailed {
            error: "refused".into(),
        });

        assert!(matches!(new_state, ChannelState::Disconnected));
        assert_eq!(
            actions,
            vec![Action::EmitEvent(ChannelEvent::ConnectionFailed {
                error: "refused".into()
            })]
        );
        assert!(!actions.iter().any(|a| matches!(a, Action::Open)));
    }

    #[test]
    fn drop_while_connected_stays_dropped() {
        let state = ChannelState::Connected;
        let (new_state, actions) = state.on_event(Event::Dropped {
            reason: "transport close".into(),
        });

        assert!(matches!(new_state, ChannelState::Disconnected));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::EmitEvent(ChannelEvent::Disconnected { reason }) if reason == "transport close"
        )));
        assert!(!actions.iter().any(|a| matches!(a, Action::Open)));
    }

    #[test]
    fn disconnect_request_from_connected_closes() {
        let state = ChannelState::Connected;
        let (new_state, actions) = state.on_event(Event::DisconnectRequested);

        assert!(matches!(new_state, ChannelState::Disconnected));
        assert!(actions.iter().any(|a| matches!(a, Action::Close)));
    }

    #[test]
    fn disconnect_request_while_connecting_closes() {
        let (new_state, actions) = ChannelState::Connecting.on_event(Event::DisconnectRequested);
        assert!(matches!(new_state, ChannelState::Disconnected));
        assert_eq!(actions, vec![Action::Close]);
    }

    #[test]
    fn disconnect_when_disconnected_is_noop() {
        let (new_state, actions) = ChannelState::Disconnected.on_event(Event::DisconnectRequested);
        assert!(matches!(new_state, ChannelState::Disconnected));
        assert!(actions.is_empty());
    }

    #[test]
    fn duplicate_connect_success_is_ignored() {
        let (new_state, actions) = ChannelState::Connected.on_event(Event::ConnectSucceeded);
        assert!(new_state.is_connected());
        assert!(actions.is_empty());
    }

    #[test]
    fn connect_request_while_connected_is_ignored() {
        let (new_state, actions) = ChannelState::Connected.on_event(Event::ConnectRequested);
        assert!(new_state.is_connected());
        assert!(actions.is_empty());
    }

    #[test]
    fn state_helpers() {
        assert!(!ChannelState::Disconnected.is_connected());
        assert!(!ChannelState::Connecting.is_connected());
        assert!(ChannelState::Connected.is_connected());
        assert!(ChannelState::Connecting.is_connecting());
        assert!(!ChannelState::Connected.is_connecting());
    }
}
