use std::sync::Arc;

use ocular_core::PeerId;
use ocular_server::SignalOutlet;

use crate::utils::{MockOutlet, TestClient, TestClientConfig, perform_signaling};
use crate::{default_stack, init_tracing};

#[tokio::test]
async fn test_ice_candidate_exchange() {
    init_tracing();

    let (router, registry) = default_stack();
    let (mock, mut signal_rx) = MockOutlet::new();
    let outlet: Arc<dyn SignalOutlet> = mock.clone();

    let peer_id = PeerId::from("ice-peer");
    let client = TestClient::new(peer_id.clone(), TestClientConfig::default())
        .await
        .expect("Failed to create test client");

    perform_signaling(&client, &router, &outlet, &mut signal_rx)
        .await
        .expect("Signaling failed");

    // Candidates flowed both ways without tearing the session down
    assert!(
        registry.lookup(&peer_id).is_some(),
        "Session should survive candidate exchange"
    );

    let server_candidates = mock.candidates_for(&peer_id).await;
    assert!(
        !server_candidates.is_empty(),
        "Server should trickle at least one candidate"
    );
    for candidate in &server_candidates {
        assert!(
            candidate["candidate"].is_string(),
            "Candidate payload should carry the candidate line"
        );
    }

    assert!(
        mock.errors_for(&peer_id).await.is_empty(),
        "Candidate exchange should not produce error replies"
    );

    client.close().await.expect("Failed to close client");
}
