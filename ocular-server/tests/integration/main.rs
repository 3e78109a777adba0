mod utils;

use std::sync::Arc;
use std::time::Duration;

use tracing::Level;

use ocular_server::{NegotiationConfig, NegotiationEngine, PeerRegistry, SignalingRouter};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Negotiation settings for same-host tests: host candidates only, no
/// external rendezvous traffic.
pub fn local_negotiation_config() -> NegotiationConfig {
    NegotiationConfig {
        ice_servers: vec![],
        ..NegotiationConfig::default()
    }
}

/// Registry, engine, and router wired the way the server wires them.
pub fn signaling_stack(config: NegotiationConfig) -> (Arc<SignalingRouter>, Arc<PeerRegistry>) {
    let registry = Arc::new(PeerRegistry::new(Duration::from_secs(2)));
    let engine = Arc::new(NegotiationEngine::new(registry.clone(), config));
    let router = Arc::new(SignalingRouter::new(registry.clone(), engine));
    (router, registry)
}

pub fn default_stack() -> (Arc<SignalingRouter>, Arc<PeerRegistry>) {
    signaling_stack(local_negotiation_config())
}
