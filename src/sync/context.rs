//! Capability gate: connectivity, offline mode, and the per-call context
//!
//! Three flags jointly decide whether a remote leg is attempted: the process
//! is online (connectivity says so and offline mode is not engaged), a remote
//! client is available, and a user is authenticated. Rather than ambient
//! globals consulted from many call sites, the flags are captured into a
//! [`SyncContext`] value at the call boundary and passed into each adapter
//! operation.

use crate::auth::AuthProvider;
use crate::error::AuthResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Process-wide connectivity signal
///
/// A shared boolean flipped by platform network events. Cloning shares the
/// underlying flag.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    /// Create a signal with an initial state
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Record a network up/down event
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Current connectivity
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Snapshot of the capability gate for one adapter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncContext {
    /// The process considers itself online
    pub online: bool,
    /// A remote client is configured and loaded
    pub remote_available: bool,
    /// A valid authenticated session is present
    pub authenticated: bool,
}

impl SyncContext {
    /// Build a context from explicit flags
    pub fn new(online: bool, remote_available: bool, authenticated: bool) -> Self {
        Self {
            online,
            remote_available,
            authenticated,
        }
    }

    /// A context that routes everything through the local path
    pub fn local_only() -> Self {
        Self::new(false, false, false)
    }

    /// Whether a remote operation may be attempted
    ///
    /// All three flags must hold; absence of any one silently routes the
    /// operation through the local-only path.
    pub fn allows_remote(&self) -> bool {
        self.online && self.remote_available && self.authenticated
    }
}

/// Owner of the offline-mode toggle; recomputes [`SyncContext`] per call
///
/// Going offline is unconditional. Going online revalidates that a live
/// authenticated session exists before the flag flips; without one the gate
/// stays offline.
pub struct SyncGate {
    connectivity: Connectivity,
    auth: Arc<dyn AuthProvider>,
    offline_mode: AtomicBool,
    remote_available: bool,
}

impl SyncGate {
    /// Create a gate over the connectivity signal and auth collaborator
    pub fn new(connectivity: Connectivity, auth: Arc<dyn AuthProvider>, remote_available: bool) -> Self {
        Self {
            connectivity,
            auth,
            offline_mode: AtomicBool::new(false),
            remote_available,
        }
    }

    /// Engage offline mode; always succeeds
    pub fn go_offline(&self) {
        self.offline_mode.store(true, Ordering::SeqCst);
        debug!("offline mode engaged");
    }

    /// Leave offline mode, revalidating the session first
    ///
    /// Errors leave the gate offline.
    pub fn try_go_online(&self) -> AuthResult<()> {
        match self.auth.current_session() {
            Ok(_) => {
                self.offline_mode.store(false, Ordering::SeqCst);
                debug!("offline mode disengaged");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "refusing to leave offline mode without a valid session");
                Err(e)
            }
        }
    }

    /// Whether offline mode is currently engaged
    pub fn is_offline(&self) -> bool {
        self.offline_mode.load(Ordering::SeqCst)
    }

    /// Capture the gate state for one adapter call
    pub fn context(&self) -> SyncContext {
        SyncContext {
            online: self.connectivity.is_online() && !self.is_offline(),
            remote_available: self.remote_available,
            authenticated: self.auth.is_authenticated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionManager;

    fn gate_with(auth: SessionManager) -> SyncGate {
        SyncGate::new(Connectivity::new(true), Arc::new(auth), true)
    }

    #[test]
    fn test_allows_remote_requires_all_three() {
        assert!(SyncContext::new(true, true, true).allows_remote());
        assert!(!SyncContext::new(false, true, true).allows_remote());
        assert!(!SyncContext::new(true, false, true).allows_remote());
        assert!(!SyncContext::new(true, true, false).allows_remote());
        assert!(!SyncContext::local_only().allows_remote());
    }

    #[test]
    fn test_go_offline_is_unconditional() {
        let gate = gate_with(SessionManager::new());
        gate.go_offline();
        assert!(gate.is_offline());
        assert!(!gate.context().allows_remote());
    }

    #[test]
    fn test_go_online_rejected_without_session() {
        let gate = gate_with(SessionManager::new());
        gate.go_offline();

        assert!(gate.try_go_online().is_err());
        assert!(gate.is_offline());
    }

    #[test]
    fn test_go_online_with_session() {
        let auth = SessionManager::new();
        auth.sign_in("ana", "token").unwrap();
        let gate = gate_with(auth);
        gate.go_offline();

        assert!(gate.try_go_online().is_ok());
        assert!(!gate.is_offline());
        assert!(gate.context().allows_remote());
    }

    #[test]
    fn test_context_follows_connectivity() {
        let connectivity = Connectivity::new(true);
        let auth = SessionManager::new();
        auth.sign_in("ana", "token").unwrap();
        let gate = SyncGate::new(connectivity.clone(), Arc::new(auth), true);

        assert!(gate.context().allows_remote());
        connectivity.set_online(false);
        assert!(!gate.context().allows_remote());
    }
}
