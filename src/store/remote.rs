//! Remote record store collaborator
//!
//! The remote store is the best-effort leg of the hybrid adapter: an
//! authenticated, user-scoped request/response interface the application
//! backend exposes. The adapter never constructs one; callers supply a
//! [`RemoteStore`] capability per call, and the capability gate decides
//! whether it is exercised.
//!
//! Absence of a record is `Ok(None)`, kept distinct from failures
//! ([`RemoteError`]). User scoping is owned by the implementation (the
//! backend client already carries the session).

use crate::error::{RemoteError, RemoteResult};
use crate::sync::record::StoredRecord;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Receipt returned by a successful remote write
#[derive(Debug, Clone, Default)]
pub struct RemoteReceipt {
    /// Identifier the remote assigned to the record, if any
    pub remote_id: Option<String>,
}

/// Authenticated, user-scoped remote record store
///
/// `upsert` replaces whatever the remote holds under the key (last-writer-
/// wins; no merge). The optional idempotency key lets a retry queue redeliver
/// a record without creating duplicates.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert or replace the record under a key scoped to the current user
    async fn upsert(
        &self,
        key: &str,
        record: &StoredRecord,
        idempotency_key: Option<Uuid>,
    ) -> RemoteResult<RemoteReceipt>;

    /// Fetch the record under a key scoped to the current user
    async fn fetch(&self, key: &str) -> RemoteResult<Option<StoredRecord>>;
}

#[derive(Default)]
struct MemoryRemoteInner {
    records: HashMap<String, StoredRecord>,
    remote_ids: HashMap<String, String>,
    delivered: HashSet<Uuid>,
}

/// In-memory remote store
///
/// Reference implementation used in tests and demos. It honors idempotency
/// keys (a redelivered record is acknowledged without a second insert) and
/// counts inserts so duplicate-delivery behavior is observable.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<RwLock<MemoryRemoteInner>>,
    inserts: Arc<AtomicUsize>,
}

impl MemoryRemote {
    /// Create a new empty remote store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes actually applied (idempotent replays excluded)
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of records currently held
    pub fn record_count(&self) -> usize {
        self.inner.read().map(|inner| inner.records.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn upsert(
        &self,
        key: &str,
        record: &StoredRecord,
        idempotency_key: Option<Uuid>,
    ) -> RemoteResult<RemoteReceipt> {
        let mut inner = self.inner.write().map_err(|_| RemoteError::WriteFailed {
            reason: "remote lock poisoned".to_string(),
        })?;

        if let Some(idk) = idempotency_key {
            if inner.delivered.contains(&idk) {
                // Replay of an already-applied delivery: acknowledge only.
                return Ok(RemoteReceipt {
                    remote_id: inner.remote_ids.get(key).cloned(),
                });
            }
            inner.delivered.insert(idk);
        }

        let remote_id = inner
            .remote_ids
            .entry(key.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        inner.records.insert(key.to_string(), record.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);

        Ok(RemoteReceipt {
            remote_id: Some(remote_id),
        })
    }

    async fn fetch(&self, key: &str) -> RemoteResult<Option<StoredRecord>> {
        let inner = self.inner.read().map_err(|_| RemoteError::ReadFailed {
            reason: "remote lock poisoned".to_string(),
        })?;
        Ok(inner.records.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_and_fetch() {
        let remote = MemoryRemote::new();
        let record = StoredRecord::new(json!({"name": "Ana"}));

        let receipt = remote.upsert("studentData", &record, None).await.unwrap();
        assert!(receipt.remote_id.is_some());

        let fetched = remote.fetch("studentData").await.unwrap().unwrap();
        assert_eq!(fetched.payload, record.payload);
    }

    #[tokio::test]
    async fn test_fetch_absent_is_none() {
        let remote = MemoryRemote::new();
        assert!(remote.fetch("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remote_id_stable_per_key() {
        let remote = MemoryRemote::new();
        let record = StoredRecord::new(json!(1));

        let first = remote.upsert("k", &record, None).await.unwrap();
        let second = remote.upsert("k", &record, None).await.unwrap();
        assert_eq!(first.remote_id, second.remote_id);
    }

    #[tokio::test]
    async fn test_idempotent_replay_is_not_reapplied() {
        let remote = MemoryRemote::new();
        let record = StoredRecord::new(json!({"score": 10}));
        let idk = Uuid::new_v4();

        remote.upsert("k", &record, Some(idk)).await.unwrap();
        remote.upsert("k", &record, Some(idk)).await.unwrap();

        assert_eq!(remote.insert_count(), 1);
        assert_eq!(remote.record_count(), 1);
    }
}
