use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ocular_core::{PeerId, SignalError, SignalMessage};

use crate::AppState;

use super::SignalOutlet;

/// Upgrades an inbound client connection into a signaling channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-channel outlet: serializes outbound messages into this channel's send
/// queue. Sending never blocks negotiation; once the client is gone the
/// queue is closed and sends turn into log lines.
struct ChannelOutlet {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelOutlet {
    fn send(&self, message: SignalMessage) {
        match serde_json::to_string(&message) {
            Ok(json) => {
                if self.tx.send(Message::Text(json.into())).is_err() {
                    debug!("Channel gone, dropping outbound {}", message.kind());
                }
            }
            Err(e) => warn!("Could not serialize outbound {}: {}", message.kind(), e),
        }
    }
}

#[async_trait]
impl SignalOutlet for ChannelOutlet {
    async fn send_answer(&self, peer_id: PeerId, payload: Value) {
        self.send(SignalMessage::Answer { peer_id, payload });
    }

    async fn send_candidate(&self, peer_id: PeerId, payload: Value) {
        self.send(SignalMessage::IceCandidate { peer_id, payload });
    }

    async fn send_error(&self, peer_id: PeerId, message: String) {
        self.send(SignalMessage::Error {
            peer_id,
            payload: SignalError { message },
        });
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("New signaling channel");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let outlet: Arc<dyn SignalOutlet> = Arc::new(ChannelOutlet { tx });

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let router = state.router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    if router.dispatch(&outlet, &text).await.is_break() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        // The channel dies here; its sessions do not. Teardown is driven by
        // the transport state observer, never by signaling going away.
        debug!("Signaling read loop finished");
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Signaling channel closed");
}
