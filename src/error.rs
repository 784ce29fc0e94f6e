//! Error types for the Matemágica sync library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the persistence layer.
//!
//! The taxonomy follows the failure policy of the hybrid adapter: local-store
//! errors escalate to the caller as explicit values, remote-store errors are
//! downgraded to local-only behavior inside the adapter, and "remote
//! unavailable" is a routing decision rather than an error.

use thiserror::Error;

/// The main error type for the Matemágica sync library
#[derive(Error, Debug)]
pub enum Error {
    /// Local store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Remote store errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid input data
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description of why the input was rejected
        message: String,
    },

    /// Other errors
    #[error("Other error: {message}")]
    Other {
        /// Human-readable description of the error
        message: String,
    },
}

/// Local-store error types
///
/// These represent failures of the durable local leg and are always surfaced
/// to the caller: losing the only durable copy of a record is user-significant.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Storage key rejected by validation
    #[error("Invalid storage key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Local write failed
    #[error("Write failed for '{key}': {reason}")]
    WriteFailed {
        /// The storage key that was being written
        key: String,
        /// Why the write failed
        reason: String,
    },

    /// Local read failed
    #[error("Read failed for '{key}': {reason}")]
    ReadFailed {
        /// The storage key that was being read
        key: String,
        /// Why the read failed
        reason: String,
    },

    /// Value exceeds the store's size limit
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// Stored text under a key is not a valid record
    #[error("Malformed record under '{key}': {reason}")]
    MalformedRecord {
        /// The storage key whose record is malformed
        key: String,
        /// Why the record is considered malformed
        reason: String,
    },
}

/// Remote-store error types
///
/// Absence of a record is not an error (`Ok(None)` from a fetch); these
/// variants cover actual failures, which the adapter logs and downgrades.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The remote rejected the credentials attached to the request
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the remote rejected the credentials
        reason: String,
    },

    /// Remote write failed
    #[error("Remote write failed: {reason}")]
    WriteFailed {
        /// Why the remote write failed
        reason: String,
    },

    /// Remote read failed
    #[error("Remote read failed: {reason}")]
    ReadFailed {
        /// Why the remote read failed
        reason: String,
    },

    /// Transport-level failure
    #[error("Connection error: {reason}")]
    Connection {
        /// Why the transport-level connection failed
        reason: String,
    },
}

/// Authentication-specific error types
#[derive(Error, Debug)]
pub enum AuthError {
    /// No user is signed in
    #[error("No authenticated user")]
    NotAuthenticated,

    /// A session exists but has expired
    #[error("Session expired at {expired_at}")]
    SessionExpired {
        /// When the session expired
        expired_at: chrono::DateTime<chrono::Utc>,
    },

    /// The authentication collaborator itself failed
    #[error("Auth provider error: {reason}")]
    Provider {
        /// Why the auth provider failed
        reason: String,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for local-store Results
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience type alias for remote-store Results
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Convenience type alias for auth Results
pub type AuthResult<T> = std::result::Result<T, AuthError>;
