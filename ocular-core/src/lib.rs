//! Shared model types for the ocular signaling protocol.

pub mod model;

pub use model::{
    DecodeError, IceServerConfig, PeerId, SignalEnvelope, SignalError, SignalMessage,
};
