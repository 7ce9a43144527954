//! Session control for the presentation shell.

use std::sync::{Arc, RwLock};

use relay_chat_core::{ConnectionState, RenderSink, Session, Transport};

use crate::manager::ConnectionManager;

/// Top-level coordinator owned by the presentation shell.
///
/// Holds the viewer's chosen identity and one `ConnectionManager`. Blank
/// input never reaches the wire: a whitespace-only identity refuses the
/// join, a whitespace-only message is dropped.
pub struct SessionController<T, R> {
    endpoint: String,
    manager: ConnectionManager<T, R>,
    identity: RwLock<Option<String>>,
}

impl<T, R> SessionController<T, R>
where
    T: Transport,
    R: RenderSink,
{
    /// Create a controller for one relay endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, transport: T, sink: Arc<R>) -> Self {
        Self {
            endpoint: endpoint.into(),
            manager: ConnectionManager::new(transport, sink),
            identity: RwLock::new(None),
        }
    }

    /// Join the chat under `identity`.
    ///
    /// Returns false — and opens nothing — when the identity is blank.
    /// The identity is fixed while a connection is live; joining again only
    /// takes effect once the previous connection has ended.
    pub fn join(&self, identity: &str) -> bool {
        let identity = identity.trim();
        if identity.is_empty() {
            return false;
        }
        let state = self.manager.state();
        if !(state == ConnectionState::Disconnected || state.is_terminal()) {
            return false;
        }

        *self.identity.write().unwrap() = Some(identity.to_owned());
        self.manager.open(&self.endpoint, identity);
        true
    }

    /// Send a chat line as `"identity: text"`.
    ///
    /// Returns true when a frame was handed to the connection, telling the
    /// shell to clear its input buffer; blank text is a no-op.
    pub fn send(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let identity = self.identity.read().unwrap();
        let Some(identity) = identity.as_deref() else {
            return false;
        };
        self.manager.send(&format!("{identity}: {text}"))
    }

    /// Tear the session down: close the connection and drop the identity.
    pub fn leave(&self) {
        self.manager.close();
        *self.identity.write().unwrap() = None;
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// Snapshot of the joined session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.identity
            .read()
            .unwrap()
            .as_ref()
            .map(|identity| Session {
                identity: identity.clone(),
                connection_state: self.manager.state(),
            })
    }
}
