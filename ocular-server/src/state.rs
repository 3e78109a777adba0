use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::camera::FrameSource;
use crate::config::ServerConfig;
use crate::negotiation::NegotiationEngine;
use crate::registry::PeerRegistry;
use crate::signaling::SignalingRouter;

/// Shared application state handed to every handler. Everything the server
/// coordinates lives here; there are no process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub registry: Arc<PeerRegistry>,
    pub engine: Arc<NegotiationEngine>,
    pub router: Arc<SignalingRouter>,
    pub frames: Arc<dyn FrameSource>,
    pub streaming: Arc<AtomicBool>,
}

impl AppState {
    /// Wires the registry, negotiation engine, and router for one server.
    pub fn new(config: ServerConfig, frames: Arc<dyn FrameSource>) -> Self {
        let registry = Arc::new(PeerRegistry::new(config.close_timeout));
        let engine = Arc::new(NegotiationEngine::new(
            registry.clone(),
            config.negotiation.clone(),
        ));
        let router = Arc::new(SignalingRouter::new(registry.clone(), engine.clone()));
        Self {
            config: Arc::new(config),
            registry,
            engine,
            router,
            frames,
            streaming: Arc::new(AtomicBool::new(false)),
        }
    }
}
