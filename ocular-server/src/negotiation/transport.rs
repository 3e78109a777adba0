use std::sync::Arc;

use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use ocular_core::IceServerConfig;

use super::NegotiationError;

/// Thin wrapper over the underlying peer connection: construction with the
/// bootstrap ICE configuration plus the few operations negotiation needs.
/// The engine registers its observers here before the transport is attached
/// to a session.
pub struct PeerTransport {
    connection: Arc<RTCPeerConnection>,
}

impl PeerTransport {
    pub async fn new(ice_servers: &[IceServerConfig]) -> Result<Self, NegotiationError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let connection = Arc::new(api.new_peer_connection(config).await?);
        Ok(Self { connection })
    }

    pub(crate) fn connection(&self) -> &Arc<RTCPeerConnection> {
        &self.connection
    }

    /// Installs the remote offer description.
    pub async fn set_remote_offer(
        &self,
        offer: RTCSessionDescription,
    ) -> Result<(), NegotiationError> {
        self.connection.set_remote_description(offer).await?;
        Ok(())
    }

    /// Synthesizes the local answer and installs it as the local description,
    /// which also starts candidate gathering.
    pub async fn create_answer(&self) -> Result<RTCSessionDescription, NegotiationError> {
        let answer = self.connection.create_answer(None).await?;
        self.connection.set_local_description(answer.clone()).await?;
        Ok(answer)
    }

    /// Adds one remote ICE candidate.
    pub async fn add_ice_candidate(
        &self,
        candidate: RTCIceCandidateInit,
    ) -> Result<(), NegotiationError> {
        self.connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    pub fn connection_state(&self) -> RTCPeerConnectionState {
        self.connection.connection_state()
    }

    pub async fn close(&self) -> Result<(), webrtc::Error> {
        self.connection.close().await
    }
}
