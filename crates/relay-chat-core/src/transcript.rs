//! Scrollback buffer with live fan-out.

use std::{collections::VecDeque, sync::RwLock};

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::{message::Message, traits::RenderSink};

/// Messages kept for late subscribers.
const SCROLLBACK_CAP: usize = 1024;

/// Rendered-message buffer with broadcast support.
///
/// A shell that attaches after the history burst still sees the full
/// conversation: `snapshot` covers what already rendered, `subscribe`
/// covers what comes next.
pub struct Transcript {
    scrollback: RwLock<VecDeque<Message>>,
    sender: broadcast::Sender<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self {
            scrollback: RwLock::new(VecDeque::with_capacity(32)),
            sender,
        }
    }

    /// Append a message and fan it out to live subscribers.
    pub fn push(&self, message: Message) {
        let _ = self.sender.send(message.clone()); // live listeners

        let mut scrollback = self.scrollback.write().unwrap();
        if scrollback.len() == SCROLLBACK_CAP {
            scrollback.pop_front();
        }
        scrollback.push_back(message);
    }

    /// Snapshot of everything rendered so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.scrollback.read().unwrap().iter().cloned().collect()
    }

    /// Receiver for live messages.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Stream that yields the snapshot first, then live messages.
    #[must_use]
    pub fn replay_plus_live(&self) -> futures::stream::BoxStream<'static, Message> {
        let (snapshot, rx) = (self.snapshot(), self.subscribe());

        let replay = futures::stream::iter(snapshot);
        let live = BroadcastStream::new(rx).filter_map(|res| async move { res.ok() });

        Box::pin(replay.chain(live))
    }
}

impl RenderSink for Transcript {
    fn on_message(&self, message: Message) {
        self.push(message);
    }
}
