use std::time::Duration;

use crate::camera::CaptureConfig;
use crate::negotiation::NegotiationConfig;

/// Everything one server instance needs. Defaults mirror a phone deployment:
/// port 8080, Google STUN bootstrap, termux capture tooling.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Transport bootstrap and session supervision.
    pub negotiation: NegotiationConfig,
    /// Bounded wait for a transport close during registry removal.
    pub close_timeout: Duration,
    /// How snapshot frames are produced.
    pub capture: CaptureConfig,
    /// Resolution label advertised on the status endpoint.
    pub resolution: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            negotiation: NegotiationConfig::default(),
            close_timeout: Duration::from_secs(5),
            capture: CaptureConfig::default(),
            resolution: "640x480".to_owned(),
        }
    }
}
