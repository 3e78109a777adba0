use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::PeerId;

/// One STUN or TURN entry for transport bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Inbound text that cannot be decoded at all. Channel-fatal: the reader
/// that hits this stops serving the client.
#[derive(Debug, Error)]
#[error("malformed signaling message: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// First decode stage. `type` and `peerId` identify the message; the payload
/// stays opaque until the discriminant is known.
#[derive(Debug, Deserialize)]
pub struct SignalEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "peerId")]
    pub peer_id: PeerId,
    #[serde(default)]
    pub payload: Value,
}

/// Body of an `error` message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalError {
    pub message: String,
}

/// A signaling message, inbound or outbound.
///
/// Session descriptions and candidate descriptors ride as opaque JSON and
/// are only ever interpreted by the transport library on either end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalMessage {
    Offer {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
        payload: Value,
    },
    Answer {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
        payload: Value,
    },
    IceCandidate {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
        payload: Value,
    },
    /// Reply when an offer is rejected. Never expected inbound.
    Error {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
        payload: SignalError,
    },
}

impl SignalMessage {
    /// Decodes one wire message in two stages: envelope first, then the
    /// discriminant. `Ok(None)` means the envelope was fine but the type is
    /// not one we speak, which callers drop without ending the channel.
    pub fn decode(text: &str) -> Result<Option<Self>, DecodeError> {
        let envelope: SignalEnvelope = serde_json::from_str(text)?;
        Ok(Self::from_envelope(envelope))
    }

    pub fn from_envelope(envelope: SignalEnvelope) -> Option<Self> {
        let SignalEnvelope {
            kind,
            peer_id,
            payload,
        } = envelope;
        match kind.as_str() {
            "offer" => Some(Self::Offer { peer_id, payload }),
            "answer" => Some(Self::Answer { peer_id, payload }),
            "ice-candidate" => Some(Self::IceCandidate { peer_id, payload }),
            "error" => {
                let payload = serde_json::from_value(payload)
                    .unwrap_or_else(|_| SignalError {
                        message: String::new(),
                    });
                Some(Self::Error { peer_id, payload })
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::Error { .. } => "error",
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        match self {
            Self::Offer { peer_id, .. }
            | Self::Answer { peer_id, .. }
            | Self::IceCandidate { peer_id, .. }
            | Self::Error { peer_id, .. } => peer_id,
        }
    }
}
