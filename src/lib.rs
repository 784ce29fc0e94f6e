//! # Matemágica Sync Library
//!
//! Hybrid local/remote persistence for the Matemágica learning app: completed
//! exercise sessions and profile data are written to a local durable store
//! unconditionally and mirrored to a remote user-scoped store on a
//! best-effort basis when a capability gate (online, remote client present,
//! authenticated) allows it.
//!
//! ## Modules
//!
//! - **Store Module**: pluggable local backends (memory, file) and the remote
//!   store collaborator trait
//! - **Auth Module**: session value, auth provider trait, session manager
//! - **Sync Module**: the hybrid adapter, capability gate, and pending queue
//!
//! ## Example
//!
//! ```rust
//! use matemagica_sync::store::MemoryStore;
//! use matemagica_sync::sync::{HybridStore, SyncContext};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = HybridStore::new(Arc::new(MemoryStore::new()));
//! let ctx = SyncContext::local_only();
//!
//! store.save(&ctx, "studentData", json!({"name": "Ana"}), None).await;
//! let record = store.load(&ctx, "studentData", None).await.unwrap().unwrap();
//! assert_eq!(record.payload["name"], "Ana");
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod auth;
pub mod error;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::auth::{AuthProvider, Session, SessionManager};
    pub use crate::error::{Error, Result, StoreError};
    pub use crate::store::{FileStore, LocalStore, MemoryRemote, MemoryStore, RemoteStore};
    pub use crate::sync::{
        Connectivity, HybridStore, PendingQueue, RemoteLeg, StoredRecord, SyncContext, SyncGate,
    };
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
