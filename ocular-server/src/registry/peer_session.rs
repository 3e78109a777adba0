use std::sync::{Arc, Mutex, OnceLock};

use tracing::warn;

use ocular_core::PeerId;

use crate::negotiation::PeerTransport;

/// Lifecycle of one peer connection as the registry sees it.
///
/// `Failed` and `Closed` are both terminal and equivalent for reclamation:
/// entering either removes the session from the registry exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Negotiating,
    Connected,
    Failed,
    Closed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }
}

/// One admitted peer: its id, its negotiation state, and the transport the
/// negotiation engine built for it.
pub struct PeerSession {
    id: PeerId,
    state: Mutex<SessionState>,
    transport: OnceLock<Arc<PeerTransport>>,
}

impl PeerSession {
    pub(crate) fn new(id: PeerId) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::Negotiating),
            transport: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Applies one transport-reported state against the transition table.
    /// Returns the state actually entered, or `None` when the report is
    /// redundant or arrives after a terminal state. Every live path into a
    /// terminal state goes through here, so the `Some(terminal)` return
    /// happens at most once per session.
    pub fn transition(&self, next: SessionState) -> Option<SessionState> {
        let mut state = self.state.lock().unwrap();
        let allowed = matches!(
            (*state, next),
            (SessionState::Negotiating, SessionState::Connected)
                | (
                    SessionState::Negotiating | SessionState::Connected,
                    SessionState::Failed | SessionState::Closed,
                )
        );
        if allowed {
            *state = next;
            Some(next)
        } else {
            None
        }
    }

    /// Fails the session only if it is still negotiating. Used by the
    /// negotiation watchdog, which must not touch a session that connected
    /// while its timer was running.
    pub fn fail_if_negotiating(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state == SessionState::Negotiating {
            *state = SessionState::Failed;
            true
        } else {
            false
        }
    }

    /// The first transport wins for the session's whole life; two channels
    /// driving one id is a protocol violation.
    pub(crate) fn attach_transport(&self, transport: Arc<PeerTransport>) {
        if self.transport.set(transport).is_err() {
            warn!("Ignoring duplicate transport attach for peer {}", self.id);
        }
    }

    pub fn transport(&self) -> Option<Arc<PeerTransport>> {
        self.transport.get().cloned()
    }
}
