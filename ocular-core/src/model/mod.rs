mod peer;
mod signaling;

pub use peer::*;
pub use signaling::*;
