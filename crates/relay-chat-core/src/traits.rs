//! Seams between the core, the transport, and the presentation shell.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::message::Message;

/// Render boundary to the presentation shell.
///
/// Called once per produced message, in order. Implementations own the
/// display surface; the core never looks back at what it handed over.
pub trait RenderSink: Send + Sync + 'static {
    /// Deliver one message to the shell.
    fn on_message(&self, message: Message);
}

/// What a connected transport reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// One inbound text frame, delivered in arrival order.
    Frame(String),
    /// The stream ended, peer- or locally-initiated.
    Closed,
    /// The stream failed.
    Failed(String),
}

/// Channel pair for one live connection.
pub struct TransportLink {
    /// Outbound text frames, fire-and-forget.
    pub outbound: mpsc::UnboundedSender<String>,
    /// Inbound events in arrival order.
    pub events: mpsc::UnboundedReceiver<LinkEvent>,
}

/// Transport error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },
}

/// Trait for duplex text transports.
///
/// The connection machinery only sees the returned channel pair, so it can
/// be driven by a real socket or by an in-memory fake interchangeably.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Establish a connection to the relay endpoint.
    ///
    /// # Errors
    /// Returns an error when the connection cannot be established.
    async fn connect(&self, endpoint: &str) -> Result<TransportLink, TransportError>;
}
