mod capture;
mod frame_source;

pub use capture::*;
pub use frame_source::*;
