use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};

use ocular_core::PeerId;

use super::PeerSession;

/// Concurrent store of live peer sessions, keyed by peer id.
///
/// The map is the one piece of state shared between signaling channels and
/// transport callbacks. Nothing awaits while holding one of its guards.
pub struct PeerRegistry {
    sessions: DashMap<PeerId, Arc<PeerSession>>,
    close_timeout: Duration,
}

impl PeerRegistry {
    pub fn new(close_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            close_timeout,
        }
    }

    /// Returns the session for `id`, creating it in `Negotiating` state when
    /// absent. The flag is true when this call created the entry. However
    /// many callers race here, at most one session per id ever exists.
    pub fn get_or_create(&self, id: &PeerId) -> (Arc<PeerSession>, bool) {
        let mut created = false;
        let session = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                created = true;
                Arc::new(PeerSession::new(id.clone()))
            })
            .value()
            .clone();
        if created {
            debug!("Registered peer session {}", id);
        }
        (session, created)
    }

    /// Pure lookup, never creates.
    pub fn lookup(&self, id: &PeerId) -> Option<Arc<PeerSession>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Removes the session for `id` and releases its transport.
    ///
    /// Idempotent: the entry is claimed atomically, so of any concurrent
    /// callers exactly one does the work. The transport close is best-effort
    /// with a bounded wait and runs outside any map guard.
    pub async fn remove(&self, id: &PeerId) {
        let Some((_, session)) = self.sessions.remove(id) else {
            return;
        };

        if let Some(transport) = session.transport() {
            match tokio::time::timeout(self.close_timeout, transport.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Transport close for peer {} failed: {}", id, e),
                Err(_) => warn!("Transport close for peer {} timed out", id),
            }
        }

        debug!("Removed peer session {}", id);
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
