//! Hybrid persistence adapter
//!
//! One read/write surface that hides whether a record currently lives
//! locally, remotely, or both. The local store is the unconditional leg of
//! every save; the remote leg runs only when the capability gate allows it
//! and a remote capability was supplied, and its failures downgrade the call
//! to local-only behavior instead of propagating.
//!
//! # Examples
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
//! let outcome = store
//!     .save(&ctx, "studentData", json!({"name": "Ana", "grade": "2"}), None)
//!     .await;
//! assert!(outcome.local.is_ok());
//!
//! let record = store.load(&ctx, "studentData", None).await.unwrap().unwrap();
//! assert_eq!(record.payload["name"], "Ana");
//! # }
//! ```

use crate::error::{RemoteError, StoreResult};
use crate::store::remote::RemoteStore;
use crate::store::{utils, LocalStore};
use crate::sync::context::SyncContext;
use crate::sync::record::StoredRecord;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a remote leg was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No remote capability was supplied for this call
    NoCapability,
    /// The capability gate was closed (offline, no client, or unauthenticated)
    GateClosed,
    /// The key failed validation, so neither leg ran
    InvalidKey,
}

/// Outcome of the remote leg of a save
#[derive(Debug)]
pub enum RemoteLeg {
    /// The remote leg was not attempted
    Skipped(SkipReason),
    /// The remote write was attempted and failed; local copy stays authoritative
    Failed(RemoteError),
    /// The remote write succeeded
    Succeeded {
        /// Identifier the remote assigned, if any
        remote_id: Option<String>,
    },
}

impl RemoteLeg {
    /// Whether the remote write succeeded
    pub fn succeeded(&self) -> bool {
        matches!(self, RemoteLeg::Succeeded { .. })
    }
}

/// Result of a [`HybridStore::save`] call, one field per leg
#[derive(Debug)]
pub struct SaveOutcome {
    /// Local leg: an error here means the only durable copy may be lost and
    /// should surface to the user
    pub local: StoreResult<()>,
    /// Remote leg: attempted/succeeded/skipped
    pub remote: RemoteLeg,
}

impl SaveOutcome {
    /// Whether the local write succeeded
    pub fn local_ok(&self) -> bool {
        self.local.is_ok()
    }

    /// Whether the remote write succeeded
    pub fn remote_ok(&self) -> bool {
        self.remote.succeeded()
    }
}

/// Hybrid local/remote persistence adapter
///
/// Write path: local first, unconditionally; then a best-effort remote
/// mirror when the gate allows. Read path: remote preferred when reachable
/// (and its result overwrites the local copy), local fallback otherwise.
/// No locking is performed; concurrent saves to one key are last-writer-wins.
pub struct HybridStore {
    local: Arc<dyn LocalStore>,
}

impl HybridStore {
    /// Create an adapter over a local store
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self { local }
    }

    /// Persist a record locally and, when permitted, remotely
    ///
    /// The local write happens first and its failure is reported in the
    /// outcome without aborting the call. The remote leg runs only if a
    /// writer was supplied and `ctx.allows_remote()`; on success the record's
    /// sync metadata is updated and re-persisted locally, on failure the
    /// local copy stays authoritative and no retry happens within this call.
    pub async fn save(
        &self,
        ctx: &SyncContext,
        key: &str,
        payload: Value,
        remote: Option<&dyn RemoteStore>,
    ) -> SaveOutcome {
        if let Err(e) = utils::validate_key(key) {
            return SaveOutcome {
                local: Err(e),
                remote: RemoteLeg::Skipped(SkipReason::InvalidKey),
            };
        }

        let mut record = StoredRecord::new(payload);
        let local = self.persist_local(key, &record);
        if let Err(e) = &local {
            warn!(key, error = %e, "local write failed");
        }

        let remote_leg = match remote {
            None => RemoteLeg::Skipped(SkipReason::NoCapability),
            Some(_) if !ctx.allows_remote() => {
                debug!(key, ?ctx, "remote leg skipped, gate closed");
                RemoteLeg::Skipped(SkipReason::GateClosed)
            }
            Some(writer) => match writer.upsert(key, &record, None).await {
                Ok(receipt) => {
                    record.meta.synced = true;
                    record.meta.remote_id = receipt.remote_id.clone();
                    if let Err(e) = self.persist_local(key, &record) {
                        // The remote copy is confirmed; only the local
                        // bookkeeping is stale.
                        warn!(key, error = %e, "failed to re-persist sync metadata");
                    }
                    RemoteLeg::Succeeded {
                        remote_id: receipt.remote_id,
                    }
                }
                Err(e) => {
                    warn!(key, error = %e, "remote write failed, keeping local copy authoritative");
                    RemoteLeg::Failed(e)
                }
            },
        };

        SaveOutcome {
            local,
            remote: remote_leg,
        }
    }

    /// Load the record under a key, preferring the remote copy when reachable
    ///
    /// A non-empty remote result overwrites the local copy and is returned.
    /// Remote failure or absence falls through to the local copy. Malformed
    /// local JSON is logged and treated as not found; local read errors
    /// escalate to the caller.
    pub async fn load(
        &self,
        ctx: &SyncContext,
        key: &str,
        remote: Option<&dyn RemoteStore>,
    ) -> StoreResult<Option<StoredRecord>> {
        utils::validate_key(key)?;

        if let Some(reader) = remote {
            if ctx.allows_remote() {
                match reader.fetch(key).await {
                    Ok(Some(record)) => {
                        if let Err(e) = self.persist_local(key, &record) {
                            warn!(key, error = %e, "failed to mirror remote record locally");
                        }
                        return Ok(Some(record));
                    }
                    Ok(None) => {
                        debug!(key, "remote holds no record, falling back to local");
                    }
                    Err(e) => {
                        warn!(key, error = %e, "remote read failed, falling back to local");
                    }
                }
            }
        }

        let storage_key = utils::prefixed_key(key);
        match self.local.get(&storage_key)? {
            None => Ok(None),
            Some(text) => match StoredRecord::from_json(key, &text) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!(key, error = %e, "malformed local record treated as absent");
                    Ok(None)
                }
            },
        }
    }

    fn persist_local(&self, key: &str, record: &StoredRecord) -> StoreResult<()> {
        let text = record.to_json()?;
        self.local.put(&utils::prefixed_key(key), &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteResult;
    use crate::store::remote::{MemoryRemote, RemoteReceipt};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use uuid::Uuid;

    struct FailingRemote;

    #[async_trait]
    impl RemoteStore for FailingRemote {
        async fn upsert(
            &self,
            _key: &str,
            _record: &StoredRecord,
            _idempotency_key: Option<Uuid>,
        ) -> RemoteResult<RemoteReceipt> {
            Err(RemoteError::Connection {
                reason: "network unreachable".to_string(),
            })
        }

        async fn fetch(&self, _key: &str) -> RemoteResult<Option<StoredRecord>> {
            Err(RemoteError::Connection {
                reason: "network unreachable".to_string(),
            })
        }
    }

    fn open_gate() -> SyncContext {
        SyncContext::new(true, true, true)
    }

    fn store() -> (HybridStore, Arc<MemoryStore>) {
        let local = Arc::new(MemoryStore::new());
        (HybridStore::new(local.clone()), local)
    }

    #[tokio::test]
    async fn test_save_local_only() {
        let (hybrid, _) = store();
        let outcome = hybrid
            .save(&SyncContext::local_only(), "studentData", json!({"name": "Ana"}), None)
            .await;

        assert!(outcome.local_ok());
        assert!(matches!(outcome.remote, RemoteLeg::Skipped(SkipReason::NoCapability)));
    }

    #[tokio::test]
    async fn test_save_invalid_key() {
        let (hybrid, _) = store();
        let outcome = hybrid.save(&open_gate(), "", json!(1), None).await;
        assert!(!outcome.local_ok());
    }

    #[tokio::test]
    async fn test_save_remote_success_marks_synced() {
        let (hybrid, _) = store();
        let remote = MemoryRemote::new();
        let outcome = hybrid
            .save(&open_gate(), "sessions", json!([{"score": 9}]), Some(&remote))
            .await;

        assert!(outcome.local_ok());
        assert!(outcome.remote_ok());

        let record = hybrid
            .load(&SyncContext::local_only(), "sessions", None)
            .await
            .unwrap()
            .unwrap();
        assert!(record.meta.synced);
        assert!(record.meta.remote_id.is_some());
    }

    #[tokio::test]
    async fn test_save_remote_failure_keeps_local() {
        let (hybrid, _) = store();
        let outcome = hybrid
            .save(&open_gate(), "sessions", json!([1]), Some(&FailingRemote))
            .await;

        assert!(outcome.local_ok());
        assert!(matches!(outcome.remote, RemoteLeg::Failed(_)));

        let record = hybrid
            .load(&SyncContext::local_only(), "sessions", None)
            .await
            .unwrap()
            .unwrap();
        assert!(!record.meta.synced);
        assert_eq!(record.payload, json!([1]));
    }

    #[tokio::test]
    async fn test_gate_closed_skips_remote() {
        let (hybrid, _) = store();
        let remote = MemoryRemote::new();
        let ctx = SyncContext::new(true, true, false);

        let outcome = hybrid.save(&ctx, "sessions", json!([1]), Some(&remote)).await;
        assert!(matches!(outcome.remote, RemoteLeg::Skipped(SkipReason::GateClosed)));
        assert_eq!(remote.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_load_prefers_remote_and_mirrors() {
        let (hybrid, local) = store();
        let remote = MemoryRemote::new();

        // Local holds a stale value; remote holds the newer one.
        hybrid
            .save(&SyncContext::local_only(), "studentData", json!({"grade": "1"}), None)
            .await;
        remote
            .upsert("studentData", &StoredRecord::new(json!({"grade": "2"})), None)
            .await
            .unwrap();

        let loaded = hybrid
            .load(&open_gate(), "studentData", Some(&remote))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.payload, json!({"grade": "2"}));

        let mirrored = local.get("matemagica.studentData").unwrap().unwrap();
        let mirrored = StoredRecord::from_json("studentData", &mirrored).unwrap();
        assert_eq!(mirrored.payload, json!({"grade": "2"}));
    }

    #[tokio::test]
    async fn test_load_falls_back_on_remote_failure() {
        let (hybrid, _) = store();
        hybrid
            .save(&SyncContext::local_only(), "studentData", json!({"name": "Ana"}), None)
            .await;

        let loaded = hybrid
            .load(&open_gate(), "studentData", Some(&FailingRemote))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.payload, json!({"name": "Ana"}));
    }

    #[tokio::test]
    async fn test_load_malformed_local_is_none() {
        let (hybrid, local) = store();
        local.put("matemagica.studentData", "{{{ not json").unwrap();

        let loaded = hybrid
            .load(&SyncContext::local_only(), "studentData", None)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_absent_is_none() {
        let (hybrid, _) = store();
        let loaded = hybrid
            .load(&SyncContext::local_only(), "nothing_here", None)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }
}
