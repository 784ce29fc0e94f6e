//! Store module for data persistence
//!
//! This module provides the two storage surfaces the hybrid adapter is built
//! on:
//! - **Local stores** - synchronous, durable key/value maps holding JSON text
//! - **Remote store** - an authenticated, user-scoped record store reached
//!   over the network
//!
//! The module follows a trait-based design allowing for pluggable backends:
//! the adapter only sees `dyn LocalStore` and `dyn RemoteStore`.
//!
//! # Examples
//!
//! ## Memory store
//!
//! ```rust
//! use matemagica_sync::store::{LocalStore, MemoryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//!
//! store.put("studentData", r#"{"name":"Ana"}"#)?;
//! assert_eq!(store.get("studentData")?.as_deref(), Some(r#"{"name":"Ana"}"#));
//! assert!(store.contains("studentData")?);
//!
//! store.remove("studentData")?;
//! assert!(!store.contains("studentData")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## File store
//!
//! ```rust
//! use matemagica_sync::store::{FileStore, FileConfig, LocalStore};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let tmp = tempfile::TempDir::new()?;
//! let config = FileConfig {
//!     base_path: PathBuf::from(tmp.path()),
//!     ..Default::default()
//! };
//! let store = FileStore::new(config)?;
//!
//! store.put("sessions", "[]")?;
//! assert_eq!(store.get("sessions")?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

// Local key/value backends
pub mod local;

// Remote record store collaborator
pub mod remote;

// Re-export main types for convenience
pub use local::{FileConfig, FileStore, LocalStore, MemoryStore};
pub use remote::{MemoryRemote, RemoteReceipt, RemoteStore};

use crate::error::{StoreError, StoreResult};

/// Storage constants
pub mod constants {
    //! Constants used throughout the store module

    /// Maximum storage key length
    pub const MAX_KEY_LENGTH: usize = 256;

    /// Maximum stored value size (5MB, the usual browser-storage budget)
    pub const MAX_VALUE_SIZE: usize = 5 * 1024 * 1024;

    /// Fixed prefix the adapter puts in front of every caller key
    pub const KEY_PREFIX: &str = "matemagica";

    /// Reserved key holding the pending-upload queue
    pub const PENDING_QUEUE_KEY: &str = "pending_sync";
}

/// Utility functions for storage keys
pub mod utils {
    use super::*;

    /// Validate a caller-supplied storage key
    ///
    /// Keys are flat names ("studentData", "exercise_sessions"), bounded in
    /// length and restricted to characters that are safe as file names.
    pub fn validate_key(key: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey {
                reason: "key cannot be empty".to_string(),
            });
        }

        if key.len() > constants::MAX_KEY_LENGTH {
            return Err(StoreError::InvalidKey {
                reason: format!("key too long (max {} characters)", constants::MAX_KEY_LENGTH),
            });
        }

        if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
            return Err(StoreError::InvalidKey {
                reason: "key contains invalid characters".to_string(),
            });
        }

        Ok(())
    }

    /// Prefix a caller key with the adapter namespace
    pub fn prefixed_key(key: &str) -> String {
        format!("{}.{}", constants::KEY_PREFIX, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(constants::MAX_KEY_LENGTH, 256);
        assert_eq!(constants::KEY_PREFIX, "matemagica");
    }

    #[test]
    fn test_validate_key() {
        assert!(utils::validate_key("studentData").is_ok());
        assert!(utils::validate_key("exercise_sessions-2").is_ok());
        assert!(utils::validate_key("").is_err());
        assert!(utils::validate_key("has space").is_err());
        assert!(utils::validate_key("has/slash").is_err());
        assert!(utils::validate_key(&"k".repeat(300)).is_err());
    }

    #[test]
    fn test_prefixed_key() {
        assert_eq!(utils::prefixed_key("studentData"), "matemagica.studentData");
    }
}
