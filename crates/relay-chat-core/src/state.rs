//! Connection lifecycle state machine.
//!
//! The transitions are pure so the machine can be driven by whatever watches
//! the transport — tasks, channels, or callbacks.

use serde::{Deserialize, Serialize};

/// Lifecycle of one connection to the relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection attempted yet.
    #[default]
    Disconnected,
    /// Dialing the relay.
    Connecting,
    /// Connected; sends are allowed.
    Open,
    /// Connection ended by either peer. Terminal until a fresh dial.
    Closed,
    /// Transport failed. Terminal until a fresh dial.
    Errored,
}

/// What the transport reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSignal {
    /// A new connection attempt is starting.
    Dial,
    /// The transport finished connecting.
    Ready,
    /// The transport closed, peer- or locally-initiated.
    Closed,
    /// The transport failed.
    Failed,
}

impl ConnectionState {
    /// Apply one transport signal and return the next state.
    ///
    /// Signals with no legal transition from the current state leave it
    /// unchanged: `Open` is reachable only through `Connecting`, and
    /// `Closed`/`Errored` absorb everything except a fresh `Dial`.
    #[must_use]
    pub const fn on_signal(self, signal: TransportSignal) -> Self {
        match (self, signal) {
            (Self::Disconnected | Self::Closed | Self::Errored, TransportSignal::Dial) => {
                Self::Connecting
            }
            (Self::Connecting, TransportSignal::Ready) => Self::Open,
            (Self::Connecting | Self::Open, TransportSignal::Failed) => Self::Errored,
            (Self::Open, TransportSignal::Closed) => Self::Closed,
            (state, _) => state,
        }
    }

    /// Whether outbound sends are allowed.
    #[must_use]
    pub const fn can_send(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether this connection instance is finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

/// Snapshot of the viewer's chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Identity chosen at join; fixed for the session's lifetime.
    pub identity: String,
    /// Connection lifecycle at snapshot time.
    pub connection_state: ConnectionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    use ConnectionState::{Closed, Connecting, Disconnected, Errored, Open};
    use TransportSignal as Sig;

    #[test]
    fn dial_connects_from_idle_and_terminal_states() {
        assert_eq!(Disconnected.on_signal(Sig::Dial), Connecting);
        assert_eq!(Closed.on_signal(Sig::Dial), Connecting);
        assert_eq!(Errored.on_signal(Sig::Dial), Connecting);
    }

    #[test]
    fn open_only_reachable_through_connecting() {
        assert_eq!(Connecting.on_signal(Sig::Ready), Open);
        assert_eq!(Disconnected.on_signal(Sig::Ready), Disconnected);
        assert_eq!(Closed.on_signal(Sig::Ready), Closed);
        assert_eq!(Errored.on_signal(Sig::Ready), Errored);
    }

    #[test]
    fn close_and_failure_transitions() {
        assert_eq!(Open.on_signal(Sig::Closed), Closed);
        assert_eq!(Open.on_signal(Sig::Failed), Errored);
        assert_eq!(Connecting.on_signal(Sig::Failed), Errored);
    }

    #[test]
    fn terminal_states_absorb_everything_but_dial() {
        for state in [Closed, Errored] {
            assert_eq!(state.on_signal(Sig::Ready), state);
            assert_eq!(state.on_signal(Sig::Closed), state);
            assert_eq!(state.on_signal(Sig::Failed), state);
            assert!(state.is_terminal());
        }
    }

    #[test]
    fn only_open_allows_sends() {
        assert!(Open.can_send());
        for state in [Disconnected, Connecting, Closed, Errored] {
            assert!(!state.can_send());
        }
    }
}
