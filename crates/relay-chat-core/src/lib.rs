//! Core abstractions for relay chat sessions.
//!
//! This crate provides the fundamental building blocks:
//! - `Message` / `classify` - Display classification for raw chat lines
//! - `parse_frame` - History-envelope vs. live-line decoding
//! - `ConnectionState` - Connection lifecycle state machine
//! - `Transcript` - Scrollback + broadcast for late-attaching shells
//! - Render and transport trait seams

pub mod message;
pub mod state;
pub mod traits;
pub mod transcript;
pub mod wire;

pub use message::{Message, MessageOrigin, classify};
pub use state::{ConnectionState, Session, TransportSignal};
pub use traits::{LinkEvent, RenderSink, Transport, TransportError, TransportLink};
pub use transcript::Transcript;
pub use wire::{Envelope, parse_frame};
