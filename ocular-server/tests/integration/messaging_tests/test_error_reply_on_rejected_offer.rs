use std::sync::Arc;

use serde_json::json;

use ocular_core::PeerId;
use ocular_server::{SessionState, SignalOutlet};

use crate::utils::{
    MockOutlet, SIGNAL_TIMEOUT_MS, TestClient, TestClientConfig, dispatch_json, wait_for_answer,
    wait_for_error,
};
use crate::{default_stack, init_tracing};

#[tokio::test]
async fn test_error_reply_on_rejected_offer() {
    init_tracing();

    let (router, registry) = default_stack();
    let (mock, mut signal_rx) = MockOutlet::new();
    let outlet: Arc<dyn SignalOutlet> = mock.clone();

    let peer_id = PeerId::from("fumbled-offer");

    // Structurally valid payload that the transport cannot parse as SDP
    let _ = dispatch_json(
        &router,
        &outlet,
        json!({
            "type": "offer",
            "peerId": peer_id.as_str(),
            "payload": {"type": "offer", "sdp": "this is not an sdp"},
        }),
    )
    .await;

    let error = wait_for_error(&mut signal_rx, &peer_id, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Failed to receive error reply");
    assert!(
        error.contains("offer rejected"),
        "Error should name the rejection, was: {error}"
    );

    // The session survives the rejection and stays retriable
    let session = registry
        .lookup(&peer_id)
        .expect("Session should survive a rejected offer");
    assert_eq!(session.state(), SessionState::Negotiating);

    // A corrected offer under the same id succeeds
    let client = TestClient::new(peer_id.clone(), TestClientConfig::default())
        .await
        .expect("Failed to create test client");
    let offer = client.create_offer().await.expect("Failed to create offer");
    let _ = dispatch_json(
        &router,
        &outlet,
        json!({"type": "offer", "peerId": peer_id.as_str(), "payload": offer}),
    )
    .await;
    let answer = wait_for_answer(&mut signal_rx, &peer_id, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Failed to receive answer after retry");
    assert_eq!(answer["type"], "answer");
    assert_eq!(registry.len(), 1);

    client.close().await.expect("Failed to close client");
}
