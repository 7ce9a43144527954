//! Shared fakes for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use relay_chat_core::{LinkEvent, Message, RenderSink, Transport, TransportError, TransportLink};

/// Peer-side handles for one in-memory link.
pub(crate) struct Peer {
    /// Frames the connection sent out.
    pub sent: mpsc::UnboundedReceiver<String>,
    /// Injects inbound events.
    pub events: mpsc::UnboundedSender<LinkEvent>,
}

/// Build a link plus its peer-side handles.
pub(crate) fn link_pair() -> (TransportLink, Peer) {
    let (outbound, sent) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    (
        TransportLink { outbound, events },
        Peer {
            sent,
            events: events_tx,
        },
    )
}

/// Transport handing out pre-built links in order.
pub(crate) struct ScriptedTransport {
    links: Mutex<Vec<Result<TransportLink, TransportError>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(links: Vec<Result<TransportLink, TransportError>>) -> Self {
        Self {
            links: Mutex::new(links),
        }
    }

    pub(crate) fn refused(endpoint: &str) -> Result<TransportLink, TransportError> {
        Err(TransportError::Connect {
            endpoint: endpoint.to_owned(),
            reason: "connection refused".to_owned(),
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, _endpoint: &str) -> Result<TransportLink, TransportError> {
        self.links.lock().unwrap().remove(0)
    }
}

/// Render sink collecting messages for assertions.
#[derive(Default)]
pub(crate) struct CollectSink {
    messages: Mutex<Vec<Message>>,
}

impl CollectSink {
    pub(crate) fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }
}

impl RenderSink for CollectSink {
    fn on_message(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }
}

/// Poll until the condition holds, or panic.
pub(crate) async fn wait_until<F: Fn() -> bool>(what: &str, condition: F) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("timed out waiting for {what}");
}
