//! Camera streaming server: peer registry, negotiation engine, signaling
//! router, and the HTTP front end that ties them together.

pub mod camera;
pub mod config;
pub mod http;
pub mod negotiation;
pub mod net;
pub mod registry;
pub mod signaling;
mod state;

pub use camera::{CaptureConfig, CaptureError, CommandCapture, FrameSource};
pub use config::ServerConfig;
pub use http::{StreamStatus, app_router};
pub use negotiation::{NegotiationConfig, NegotiationEngine, NegotiationError, PeerTransport};
pub use net::local_ip;
pub use registry::{PeerRegistry, PeerSession, SessionState};
pub use signaling::{SignalOutlet, SignalingRouter};
pub use state::AppState;
