//! Connection lifecycle management.

use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use relay_chat_core::{
    ConnectionState, LinkEvent, Message, RenderSink, Transport, TransportSignal, parse_frame,
};

/// Notice rendered when the connection ends.
const CLOSED_NOTICE: &str = "Connection to the server was lost. Rejoin to continue.";
/// Notice rendered when the transport fails.
const ERRORED_NOTICE: &str = "Chat server connection error.";

/// One connection instance: its state cell, outbound queue, and local
/// shutdown handle.
struct Link {
    id: Uuid,
    state: RwLock<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
    shutdown: Notify,
}

/// Owns the relay connection's lifecycle and the outbound-send guard.
///
/// Inbound frames are parsed and forwarded to the render sink in arrival
/// order. `Closed` and `Errored` are terminal for a connection instance; a
/// later `open` starts a fresh instance, and stale tasks from the old one
/// cannot touch it.
pub struct ConnectionManager<T, R> {
    transport: Arc<T>,
    sink: Arc<R>,
    link: Mutex<Option<Arc<Link>>>,
}

impl<T, R> ConnectionManager<T, R>
where
    T: Transport,
    R: RenderSink,
{
    /// Create a manager that renders through `sink`.
    #[must_use]
    pub fn new(transport: T, sink: Arc<R>) -> Self {
        Self {
            transport: Arc::new(transport),
            sink,
            link: Mutex::new(None),
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.link
            .lock()
            .unwrap()
            .as_ref()
            .map_or(ConnectionState::Disconnected, |link| {
                *link.state.read().unwrap()
            })
    }

    /// Dial the relay endpoint.
    ///
    /// No-op while a connection is already dialing or open. A connect
    /// failure is signaled through the state and a system notice, never to
    /// the caller.
    pub fn open(&self, endpoint: &str, viewer: &str) {
        let mut slot = self.link.lock().unwrap();
        if let Some(link) = slot.as_ref() {
            let state = *link.state.read().unwrap();
            if !state.is_terminal() {
                tracing::debug!(conn = %link.id, ?state, "open ignored, connection still active");
                return;
            }
        }

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let link = Arc::new(Link {
            id: Uuid::new_v4(),
            state: RwLock::new(ConnectionState::Disconnected.on_signal(TransportSignal::Dial)),
            outbound,
            shutdown: Notify::new(),
        });
        *slot = Some(Arc::clone(&link));
        drop(slot);

        tracing::info!(conn = %link.id, endpoint, "connecting");

        let transport = Arc::clone(&self.transport);
        let sink = Arc::clone(&self.sink);
        let endpoint = endpoint.to_owned();
        let viewer = viewer.to_owned();
        tokio::spawn(async move {
            run_connection(&link, &*transport, &*sink, &endpoint, &viewer, outbound_rx).await;
        });
    }

    /// Transmit one frame verbatim.
    ///
    /// Allowed only while the connection is open; returns false and sends
    /// nothing otherwise.
    pub fn send(&self, text: &str) -> bool {
        let Some(link) = self.link.lock().unwrap().clone() else {
            return false;
        };
        if !link.state.read().unwrap().can_send() {
            return false;
        }
        link.outbound.send(text.to_owned()).is_ok()
    }

    /// Close the current connection locally.
    ///
    /// No-op unless the connection is open.
    pub fn close(&self) {
        let Some(link) = self.link.lock().unwrap().clone() else {
            return;
        };
        if !link.state.read().unwrap().can_send() {
            return;
        }
        apply(&link, &*self.sink, TransportSignal::Closed);
        link.shutdown.notify_one();
    }
}

/// Event loop for one connection instance.
///
/// A single task handles the dial, the outbound queue, and inbound events,
/// so everything the shell observes happens in arrival order.
async fn run_connection<T, R>(
    link: &Arc<Link>,
    transport: &T,
    sink: &R,
    endpoint: &str,
    viewer: &str,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
) where
    T: Transport,
    R: RenderSink,
{
    let mut wire = match transport.connect(endpoint).await {
        Ok(wire) => wire,
        Err(e) => {
            tracing::warn!(conn = %link.id, error = %e, "connect failed");
            apply(link, sink, TransportSignal::Failed);
            return;
        }
    };

    apply(link, sink, TransportSignal::Ready);
    tracing::info!(conn = %link.id, "open");

    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if wire.outbound.send(frame).is_err() {
                            apply(link, sink, TransportSignal::Failed);
                            break;
                        }
                    }
                    // Manager dropped; nothing left to forward.
                    None => break,
                }
            }
            event = wire.events.recv() => {
                match event {
                    Some(LinkEvent::Frame(raw)) => {
                        for message in parse_frame(&raw, viewer) {
                            sink.on_message(message);
                        }
                    }
                    Some(LinkEvent::Closed) | None => {
                        apply(link, sink, TransportSignal::Closed);
                        break;
                    }
                    Some(LinkEvent::Failed(reason)) => {
                        tracing::warn!(conn = %link.id, %reason, "transport failed");
                        apply(link, sink, TransportSignal::Failed);
                        break;
                    }
                }
            }
            () = link.shutdown.notified() => break,
        }
    }
}

/// Run one signal through the state machine and surface the outcome.
///
/// The no-op transitions guarantee at most one notice per connection
/// instance, even when the link reports both a failure and a close.
fn apply<R: RenderSink>(link: &Link, sink: &R, signal: TransportSignal) {
    let mut state = link.state.write().unwrap();
    let prior = *state;
    let next = prior.on_signal(signal);
    *state = next;
    drop(state);

    if next == prior {
        return;
    }
    tracing::debug!(conn = %link.id, from = ?prior, to = ?next, "state change");

    match next {
        ConnectionState::Closed => sink.on_message(Message::system(CLOSED_NOTICE)),
        ConnectionState::Errored => sink.on_message(Message::system(ERRORED_NOTICE)),
        _ => {}
    }
}
