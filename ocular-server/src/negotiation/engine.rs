use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use ocular_core::IceServerConfig;

use crate::registry::{PeerRegistry, PeerSession, SessionState};
use crate::signaling::SignalOutlet;

use super::PeerTransport;

/// Why an offer or candidate could not be applied. Session-local and
/// recoverable: the session stays registered and the client may retry.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("malformed session description: {0}")]
    MalformedDescription(#[source] serde_json::Error),
    #[error("malformed ice candidate: {0}")]
    MalformedCandidate(#[source] serde_json::Error),
    #[error("failed to encode session description: {0}")]
    EncodeDescription(#[source] serde_json::Error),
    #[error("peer transport not established")]
    TransportMissing,
    #[error("transport rejected negotiation input: {0}")]
    Transport(#[from] webrtc::Error),
}

/// Transport bootstrap and session supervision settings.
#[derive(Debug, Clone)]
pub struct NegotiationConfig {
    /// Rendezvous servers for address discovery. At least one externally
    /// reachable STUN url is expected for peers beyond the local network.
    pub ice_servers: Vec<IceServerConfig>,
    /// How long a session may sit in `Negotiating` before it is failed.
    pub timeout: Duration,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
            timeout: Duration::from_secs(30),
        }
    }
}

/// Drives peer sessions through description and candidate exchange, and owns
/// the observers that feed transport events back into the registry.
pub struct NegotiationEngine {
    registry: Arc<PeerRegistry>,
    config: NegotiationConfig,
}

impl NegotiationEngine {
    pub fn new(registry: Arc<PeerRegistry>, config: NegotiationConfig) -> Self {
        Self { registry, config }
    }

    /// Builds the transport for a freshly registered session, attaches it,
    /// and registers the inbound-media, local-candidate, and connection-state
    /// observers. Also arms the negotiation watchdog for the session.
    pub async fn create_session(
        &self,
        session: &Arc<PeerSession>,
        outlet: Arc<dyn SignalOutlet>,
    ) -> Result<(), NegotiationError> {
        let transport = Arc::new(PeerTransport::new(&self.config.ice_servers).await?);
        session.attach_transport(transport.clone());

        let peer_id = session.id().clone();
        let connection = transport.connection();

        // Inbound media is drained, not decoded. An unread track stalls the
        // transport's receive path, so the reader runs for the track's life.
        {
            let peer_id = peer_id.clone();
            connection.on_track(Box::new(move |track, _receiver, _transceiver| {
                let peer_id = peer_id.clone();
                Box::pin(async move {
                    info!("Inbound {} track from peer {}", track.kind(), peer_id);
                    tokio::spawn(async move {
                        loop {
                            if let Err(e) = track.read_rtp().await {
                                debug!("Track from peer {} ended: {}", peer_id, e);
                                return;
                            }
                        }
                    });
                })
            }));
        }

        // Locally discovered candidates trickle out through the signaling
        // channel that carried the offer. A `None` candidate means gathering
        // finished and is not forwarded.
        {
            let peer_id = peer_id.clone();
            let outlet = outlet.clone();
            connection.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
                let peer_id = peer_id.clone();
                let outlet = outlet.clone();
                Box::pin(async move {
                    let Some(candidate) = candidate else {
                        debug!("ICE gathering complete for peer {}", peer_id);
                        return;
                    };
                    let init = match candidate.to_json() {
                        Ok(init) => init,
                        Err(e) => {
                            warn!("Could not serialize candidate for peer {}: {}", peer_id, e);
                            return;
                        }
                    };
                    match serde_json::to_value(&init) {
                        Ok(payload) => outlet.send_candidate(peer_id, payload).await,
                        Err(e) => {
                            warn!("Could not encode candidate for peer {}: {}", peer_id, e)
                        }
                    }
                })
            }));
        }

        // Transport state feeds the session state machine; a terminal entry
        // reclaims the registry slot. The callback holds the session weakly
        // so a removed session can actually drop its transport, and the
        // removal itself runs in its own task because it closes the transport
        // whose notification path we are on.
        {
            let registry = self.registry.clone();
            let weak = Arc::downgrade(session);
            let peer_id = peer_id.clone();
            connection.on_peer_connection_state_change(Box::new(
                move |state: RTCPeerConnectionState| {
                    let registry = registry.clone();
                    let weak = weak.clone();
                    let peer_id = peer_id.clone();
                    Box::pin(async move {
                        info!("Peer {} connection state: {:?}", peer_id, state);
                        let next = match state {
                            RTCPeerConnectionState::Connected => SessionState::Connected,
                            RTCPeerConnectionState::Failed => SessionState::Failed,
                            RTCPeerConnectionState::Closed => SessionState::Closed,
                            // New, Connecting, and Disconnected are transient.
                            _ => return,
                        };
                        let Some(session) = weak.upgrade() else {
                            return;
                        };
                        if session.transition(next).is_some_and(SessionState::is_terminal) {
                            tokio::spawn(async move {
                                registry.remove(&peer_id).await;
                            });
                        }
                    })
                },
            ));
        }

        self.arm_watchdog(session);
        Ok(())
    }

    /// Applies a remote offer to the session's transport and produces the
    /// local answer payload.
    pub async fn accept_offer(
        &self,
        session: &PeerSession,
        payload: Value,
    ) -> Result<Value, NegotiationError> {
        let transport = session
            .transport()
            .ok_or(NegotiationError::TransportMissing)?;
        let offer: RTCSessionDescription =
            serde_json::from_value(payload).map_err(NegotiationError::MalformedDescription)?;

        transport.set_remote_offer(offer).await?;
        let answer = transport.create_answer().await?;
        let payload =
            serde_json::to_value(&answer).map_err(NegotiationError::EncodeDescription)?;

        info!("Negotiated answer for peer {}", session.id());
        Ok(payload)
    }

    /// Adds a remote candidate to the session's transport. Failures are for
    /// the caller to log; they never tear the session down.
    pub async fn apply_candidate(
        &self,
        session: &PeerSession,
        payload: Value,
    ) -> Result<(), NegotiationError> {
        let transport = session
            .transport()
            .ok_or(NegotiationError::TransportMissing)?;
        let candidate: RTCIceCandidateInit =
            serde_json::from_value(payload).map_err(NegotiationError::MalformedCandidate)?;
        transport.add_ice_candidate(candidate).await?;
        Ok(())
    }

    /// Sessions that never leave `Negotiating` would otherwise sit in the
    /// registry forever, since reclamation rides the connection-state
    /// observer and a transport that never connected may never report.
    fn arm_watchdog(&self, session: &Arc<PeerSession>) {
        let registry = self.registry.clone();
        let weak = Arc::downgrade(session);
        let peer_id = session.id().clone();
        let timeout = self.config.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let Some(session) = weak.upgrade() else {
                return;
            };
            if session.fail_if_negotiating() {
                warn!(
                    "Peer {} still negotiating after {:?}, failing the session",
                    peer_id, timeout
                );
                registry.remove(&peer_id).await;
            }
        });
    }
}
