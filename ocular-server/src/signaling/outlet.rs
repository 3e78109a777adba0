use async_trait::async_trait;
use serde_json::Value;

use ocular_core::PeerId;

/// Outbound half of one signaling channel.
///
/// The router and the negotiation observers push answers, discovered
/// candidates, and error replies through this seam. The WebSocket handler
/// implements it for real clients; tests implement it to capture traffic.
/// Sends are fire-and-forget: a gone client costs a log line, nothing more.
#[async_trait]
pub trait SignalOutlet: Send + Sync {
    /// Sends an SDP answer for `peer_id`.
    async fn send_answer(&self, peer_id: PeerId, payload: Value);

    /// Sends a locally discovered ICE candidate for `peer_id`.
    async fn send_candidate(&self, peer_id: PeerId, payload: Value);

    /// Sends an error reply for `peer_id`.
    async fn send_error(&self, peer_id: PeerId, message: String);
}
