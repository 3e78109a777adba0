use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use ocular_core::{PeerId, SignalMessage};

use crate::negotiation::NegotiationEngine;
use crate::registry::PeerRegistry;

use super::SignalOutlet;

/// Dispatches decoded signaling messages into the registry and the
/// negotiation engine. One router serves every channel; the per-channel
/// outlet is passed in with each frame.
pub struct SignalingRouter {
    registry: Arc<PeerRegistry>,
    engine: Arc<NegotiationEngine>,
}

impl SignalingRouter {
    pub fn new(registry: Arc<PeerRegistry>, engine: Arc<NegotiationEngine>) -> Self {
        Self { registry, engine }
    }

    /// Handles one inbound text frame. `Break` tells the channel loop to
    /// stop reading (undecodable input); unknown message types are dropped
    /// and the loop continues.
    pub async fn dispatch(
        &self,
        outlet: &Arc<dyn SignalOutlet>,
        text: &str,
    ) -> ControlFlow<()> {
        let message = match SignalMessage::decode(text) {
            Ok(Some(message)) => message,
            Ok(None) => {
                warn!("Ignoring signaling message of unknown type");
                return ControlFlow::Continue(());
            }
            Err(e) => {
                warn!("Undecodable signaling message, ending channel: {}", e);
                return ControlFlow::Break(());
            }
        };

        debug!("Signaling {} from peer {}", message.kind(), message.peer_id());
        match message {
            SignalMessage::Offer { peer_id, payload } => {
                self.handle_offer(outlet, peer_id, payload).await;
            }
            SignalMessage::Answer { peer_id, .. } => {
                // Reserved for a server-initiated offer flow; nothing drives
                // one today, so receipt is only recorded.
                info!("Answer received from peer {}", peer_id);
            }
            SignalMessage::IceCandidate { peer_id, payload } => {
                self.handle_candidate(peer_id, payload).await;
            }
            SignalMessage::Error { peer_id, payload } => {
                warn!("Error from peer {}: {}", peer_id, payload.message);
            }
        }
        ControlFlow::Continue(())
    }

    async fn handle_offer(&self, outlet: &Arc<dyn SignalOutlet>, peer_id: PeerId, payload: Value) {
        let (session, created) = self.registry.get_or_create(&peer_id);

        if created {
            info!("Peer {} connected, creating session", peer_id);
            if let Err(e) = self.engine.create_session(&session, outlet.clone()).await {
                warn!("Session setup for peer {} failed: {}", peer_id, e);
                self.registry.remove(&peer_id).await;
                outlet
                    .send_error(peer_id, format!("session setup failed: {e}"))
                    .await;
                return;
            }
        }

        match self.engine.accept_offer(&session, payload).await {
            Ok(answer) => outlet.send_answer(peer_id, answer).await,
            Err(e) => {
                warn!("Rejected offer from peer {}: {}", peer_id, e);
                outlet
                    .send_error(peer_id, format!("offer rejected: {e}"))
                    .await;
            }
        }
    }

    async fn handle_candidate(&self, peer_id: PeerId, payload: Value) {
        let Some(session) = self.registry.lookup(&peer_id) else {
            debug!("Dropping candidate for unknown peer {}", peer_id);
            return;
        };
        if let Err(e) = self.engine.apply_candidate(&session, payload).await {
            warn!("Dropping candidate for peer {}: {}", peer_id, e);
        }
    }
}
