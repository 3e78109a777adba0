mod engine;
mod transport;

pub use engine::*;
pub use transport::*;
