//! Authentication collaborator
//!
//! The sync layer does not own authentication; it consults it. This module
//! defines the session value and the small surface the capability gate needs:
//! a cached "is someone signed in" check and a live session fetch. Tokens are
//! opaque strings minted by the application backend.

use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Default session lifetime (1 hour)
const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// An authenticated user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// User identifier
    pub user_id: String,
    /// Opaque access token
    pub access_token: String,
    /// Session creation time
    pub issued_at: DateTime<Utc>,
    /// Session expiration time
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Read-only view of authentication state
///
/// `is_authenticated` is the cheap cached check the gate consults on every
/// call; `current_session` is the live check used when flipping out of
/// offline mode.
pub trait AuthProvider: Send + Sync {
    /// Whether a non-expired session is currently held
    fn is_authenticated(&self) -> bool;

    /// Fetch the current session, erroring if absent or expired
    fn current_session(&self) -> AuthResult<Session>;
}

/// Single-session manager with TTL expiry
///
/// Holds at most one session for the signed-in student or guardian.
pub struct SessionManager {
    session: RwLock<Option<Session>>,
    session_ttl: Duration,
}

impl SessionManager {
    /// Create a manager with the default session lifetime
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }

    /// Create a manager with a custom session lifetime
    pub fn with_ttl(session_ttl: Duration) -> Self {
        Self {
            session: RwLock::new(None),
            session_ttl,
        }
    }

    /// Install a session for the given user, replacing any prior one
    pub fn sign_in(&self, user_id: &str, access_token: &str) -> AuthResult<Session> {
        let now = Utc::now();
        let session = Session {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
            issued_at: now,
            expires_at: now + self.session_ttl,
        };

        let mut slot = self.session.write().map_err(|_| AuthError::Provider {
            reason: "session lock poisoned".to_string(),
        })?;
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Drop the current session, if any
    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.session.write() {
            *slot = None;
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for SessionManager {
    fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .map(|slot| slot.as_ref().is_some_and(|s| !s.is_expired()))
            .unwrap_or(false)
    }

    fn current_session(&self) -> AuthResult<Session> {
        let slot = self.session.read().map_err(|_| AuthError::Provider {
            reason: "session lock poisoned".to_string(),
        })?;
        match slot.as_ref() {
            None => Err(AuthError::NotAuthenticated),
            Some(s) if s.is_expired() => Err(AuthError::SessionExpired {
                expired_at: s.expires_at,
            }),
            Some(s) => Ok(s.clone()),
        }
    }
}
