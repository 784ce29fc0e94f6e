//! Hybrid sync layer
//!
//! Ties the stores and collaborators together:
//! - [`record`] - the stored-record envelope and its sync metadata
//! - [`context`] - connectivity signal, offline-mode gate, per-call context
//! - [`hybrid`] - the hybrid persistence adapter itself
//! - [`pending`] - the best-effort retry queue flushed on reconnect

pub mod context;
pub mod hybrid;
pub mod pending;
pub mod record;

// Re-export main types for convenience
pub use context::{Connectivity, SyncContext, SyncGate};
pub use hybrid::{HybridStore, RemoteLeg, SaveOutcome, SkipReason};
pub use pending::{FlushReport, PendingQueue};
pub use record::{PendingRecord, StoredRecord, SyncMetadata};
