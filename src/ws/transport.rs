//! WebSocket transport to the game server
//!
//! The socket is split into a reader task that parses inbound frames into
//! [`TransportEvent`]s and a writer task that serialises outbound
//! [`ClientMsg`]s. The session side only ever holds a [`Transport`] handle
//! and the event receiver.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::protocol::{ClientMsg, ServerMsg};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Inbound notification from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(ServerMsg),
    Closed,
    Error(String),
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("WebSocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Transport is closed")]
    Closed,
}

/// Handle to an open transport. Dropping or closing it stops both tasks.
pub struct Transport {
    outbound: Option<mpsc::UnboundedSender<ClientMsg>>,
    reader: Option<JoinHandle<()>>,
}

impl Transport {
    /// Connect to `url` for one match
    pub async fn connect(
        url: &str,
        match_id: Uuid,
        address: &str,
    ) -> Result<(Self, mpsc::Receiver<TransportEvent>), TransportError> {
        let endpoint = endpoint(url, match_id, address);
        let (ws, _) = tokio_tungstenite::connect_async(endpoint.as_str()).await?;
        info!(%match_id, url, "Transport connected");

        let (mut sink, mut stream) = ws.split();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientMsg>();

        let _ = event_tx.send(TransportEvent::Opened).await;

        // Writer: outbound messages -> WebSocket. Ends with a close frame once
        // the handle drops its sender.
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "Failed to encode outbound message");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json)).await {
                    debug!(error = %e, "WebSocket send failed");
                    break;
                }
            }
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        });

        // Reader: WebSocket -> session
        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                let event = match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerMsg>(&text) {
                        Ok(msg) => TransportEvent::Message(msg),
                        Err(e) => {
                            warn!(error = %e, "Failed to parse server message");
                            continue;
                        }
                    },
                    Ok(Message::Close(_)) => {
                        info!("Server closed the connection");
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        error!(error = %e, "WebSocket error");
                        let _ = event_tx.send(TransportEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                if event_tx.send(event).await.is_err() {
                    // Receiver dropped
                    return;
                }
            }
            let _ = event_tx.send(TransportEvent::Closed).await;
        });

        Ok((
            Self {
                outbound: Some(outbound_tx),
                reader: Some(reader),
            },
            event_rx,
        ))
    }

    /// Transport without a socket: outbound messages land on the returned
    /// receiver. Used to drive the runtime in tests and tools.
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<ClientMsg>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (
            Self {
                outbound: Some(outbound_tx),
                reader: None,
            },
            outbound_rx,
        )
    }

    pub fn send(&self, msg: ClientMsg) -> Result<(), TransportError> {
        let outbound = self.outbound.as_ref().ok_or(TransportError::Closed)?;
        outbound.send(msg).map_err(|_| TransportError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_none()
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if self.outbound.take().is_none() {
            return;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        debug!("Transport closed");
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}

fn endpoint(url: &str, match_id: Uuid, address: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}matchId={match_id}&address={address}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_match_query() {
        let id = Uuid::nil();
        assert_eq!(
            endpoint("wss://arena.example/ws", id, "0xabc"),
            format!("wss://arena.example/ws?matchId={id}&address=0xabc")
        );
        assert_eq!(
            endpoint("ws://localhost:8080/ws?v=2", id, "0xabc"),
            format!("ws://localhost:8080/ws?v=2&matchId={id}&address=0xabc")
        );
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (mut transport, mut sent) = Transport::detached();
        transport.send(ClientMsg::Forfeit).unwrap();
        assert_eq!(sent.recv().await, Some(ClientMsg::Forfeit));

        transport.close();
        transport.close();
        assert!(transport.is_closed());
        assert!(matches!(
            transport.send(ClientMsg::Forfeit),
            Err(TransportError::Closed)
        ));
        assert_eq!(sent.recv().await, None);
    }
}
