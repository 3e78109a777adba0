//! Facade crate: the model types always, the server behind a feature.

pub use ocular_core::model::PeerId;

pub mod model {
    pub use ocular_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use ocular_server::*;
}
