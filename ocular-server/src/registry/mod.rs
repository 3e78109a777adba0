mod peer_session;
mod registry;

pub use peer_session::*;
pub use registry::*;
