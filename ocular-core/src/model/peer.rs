use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier a remote client picks for itself when it starts signaling.
///
/// Treated as an opaque string: uniqueness only matters among sessions that
/// are live at the same time, and nothing about the format is enforced.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct PeerId(pub String);

impl PeerId {
    /// Mints a fresh random id for callers that do not bring their own.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PeerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
