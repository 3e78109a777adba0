mod outlet;
mod router;
mod ws_handler;

pub use outlet::*;
pub use router::*;
pub use ws_handler::*;
