use std::sync::Arc;

use serde_json::json;

use ocular_server::SignalOutlet;

use crate::utils::{MockOutlet, dispatch_json};
use crate::{default_stack, init_tracing};

#[tokio::test]
async fn test_candidate_before_offer_is_dropped() {
    init_tracing();

    let (router, registry) = default_stack();
    let (mock, _signal_rx) = MockOutlet::new();
    let outlet: Arc<dyn SignalOutlet> = mock.clone();

    // A candidate for a peer that never sent an offer
    let flow = dispatch_json(
        &router,
        &outlet,
        json!({
            "type": "ice-candidate",
            "peerId": "early-bird",
            "payload": {"candidate": "candidate:1 1 udp 2130706431 192.168.1.7 51000 typ host"},
        }),
    )
    .await;

    // Dropped quietly: the channel lives on and nothing was registered
    assert!(flow.is_continue());
    assert!(registry.is_empty());
    assert_eq!(mock.capture_count().await, 0);
}
