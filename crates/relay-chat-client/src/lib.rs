//! Connection management and session control for relay chat.
//!
//! Provides:
//! - `WsTransport` - WebSocket transport over tokio-tungstenite
//! - `ConnectionManager` - Connection lifecycle and outbound-send guard
//! - `SessionController` - Identity handling and the shell-facing API

pub mod controller;
pub mod manager;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::SessionController;
pub use manager::ConnectionManager;
pub use transport::WsTransport;
