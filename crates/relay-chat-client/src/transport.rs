//! WebSocket transport for the relay connection.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use relay_chat_core::{LinkEvent, Transport, TransportError, TransportLink};

/// Transport over `tokio-tungstenite`.
///
/// Each connect spawns a reader and a writer task bridging the socket to the
/// returned channel pair; dropping the link's outbound sender stops the
/// writer.
#[derive(Debug, Default, Clone)]
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, endpoint: &str) -> Result<TransportLink, TransportError> {
        let (socket, _) = connect_async(endpoint)
            .await
            .map_err(|e| TransportError::Connect {
                endpoint: endpoint.to_owned(),
                reason: e.to_string(),
            })?;
        let (mut ws_tx, mut ws_rx) = socket.split();

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, events) = mpsc::unbounded_channel::<LinkEvent>();

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if ws_tx.send(WsMessage::Text(frame)).await.is_err() {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(next) = ws_rx.next().await {
                let event = match next {
                    Ok(WsMessage::Text(text)) => LinkEvent::Frame(text),
                    Ok(WsMessage::Binary(data)) => match String::from_utf8(data) {
                        Ok(text) => LinkEvent::Frame(text),
                        Err(_) => continue,
                    },
                    Ok(WsMessage::Close(_)) => LinkEvent::Closed,
                    Ok(_) => continue,
                    Err(e) => LinkEvent::Failed(e.to_string()),
                };

                let ended = !matches!(event, LinkEvent::Frame(_));
                if event_tx.send(event).is_err() || ended {
                    return;
                }
            }
            // EOF without a close frame still ends the connection.
            let _ = event_tx.send(LinkEvent::Closed);
        });

        Ok(TransportLink { outbound, events })
    }
}
