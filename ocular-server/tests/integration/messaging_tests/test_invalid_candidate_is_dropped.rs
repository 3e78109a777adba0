use std::sync::Arc;

use serde_json::json;

use ocular_core::PeerId;
use ocular_server::{SessionState, SignalOutlet};

use crate::utils::{
    MockOutlet, SIGNAL_TIMEOUT_MS, TestClient, TestClientConfig, dispatch_json, wait_for_answer,
};
use crate::{default_stack, init_tracing};

#[tokio::test]
async fn test_invalid_candidate_is_dropped() {
    init_tracing();

    let (router, registry) = default_stack();
    let (mock, mut signal_rx) = MockOutlet::new();
    let outlet: Arc<dyn SignalOutlet> = mock.clone();

    let peer_id = PeerId::from("clumsy-peer");
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
    wait_for_answer(&mut signal_rx, &peer_id, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Failed to receive answer");

    // A candidate payload that is not a candidate at all
    let flow = dispatch_json(
        &router,
        &outlet,
        json!({"type": "ice-candidate", "peerId": peer_id.as_str(), "payload": 42}),
    )
    .await;

    // Dropped and logged: the channel and the session both live on
    assert!(flow.is_continue());
    let session = registry
        .lookup(&peer_id)
        .expect("Session should survive a bad candidate");
    assert_eq!(session.state(), SessionState::Negotiating);
    assert!(
        mock.errors_for(&peer_id).await.is_empty(),
        "Candidate failures get no error reply"
    );

    client.close().await.expect("Failed to close client");
}
