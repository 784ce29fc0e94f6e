//! Best-effort retry queue for failed remote writes
//!
//! The adapter itself never retries; callers append a record here when a
//! save's remote leg fails and flush the queue opportunistically on a
//! reconnect signal. The queue is persisted in the local store under a
//! reserved key, so queued uploads survive a restart. Every entry carries a
//! client-generated idempotency key: a flush repeated after a partial
//! failure redelivers entries, but an idempotency-aware remote will not
//! create duplicates.
//!
//! Delivery is last-writer-wins on the remote side, with no check for
//! remote-side changes made while offline. A flush can therefore overwrite
//! remote data that changed in the meantime; callers that care must read
//! before flushing.

use crate::error::{StoreError, StoreResult};
use crate::store::remote::RemoteStore;
use crate::store::{constants, utils, LocalStore};
use crate::sync::context::SyncContext;
use crate::sync::record::{PendingRecord, StoredRecord};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of one flush attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries delivered and removed from the queue
    pub delivered: usize,
    /// Entries still queued after the attempt
    pub remaining: usize,
}

/// Durable queue of records awaiting a remote delivery
pub struct PendingQueue {
    local: Arc<dyn LocalStore>,
    queue_key: String,
}

impl PendingQueue {
    /// Create a queue persisted in the given local store
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self {
            local,
            queue_key: utils::prefixed_key(constants::PENDING_QUEUE_KEY),
        }
    }

    /// Append a record that failed its remote leg, returning its idempotency key
    pub fn enqueue(&self, key: &str, record: StoredRecord) -> StoreResult<Uuid> {
        utils::validate_key(key)?;
        let entry = PendingRecord::new(key, record);
        let idempotency_key = entry.idempotency_key;

        let mut entries = self.read_entries()?;
        entries.push(entry);
        self.write_entries(&entries)?;

        debug!(key, queued = entries.len(), "record queued for later upload");
        Ok(idempotency_key)
    }

    /// Number of queued entries
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_entries()?.len())
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_entries()?.is_empty())
    }

    /// Attempt to deliver every queued entry
    ///
    /// Skipped entirely when the gate is closed. Entries are tried in queue
    /// order; failures stay queued for the next flush and do not stop later
    /// entries. Delivered entries are removed. The live record under an
    /// entry's key is not rewritten: a newer save may have replaced it, and
    /// clobbering it with queue-time metadata would lose that write.
    pub async fn flush(&self, ctx: &SyncContext, remote: &dyn RemoteStore) -> StoreResult<FlushReport> {
        let entries = self.read_entries()?;
        if entries.is_empty() {
            return Ok(FlushReport {
                delivered: 0,
                remaining: 0,
            });
        }

        if !ctx.allows_remote() {
            debug!(queued = entries.len(), "flush skipped, gate closed");
            return Ok(FlushReport {
                delivered: 0,
                remaining: entries.len(),
            });
        }

        let mut kept = Vec::new();
        let mut delivered = 0usize;

        for entry in entries {
            match remote
                .upsert(&entry.key, &entry.record, Some(entry.idempotency_key))
                .await
            {
                Ok(_) => delivered += 1,
                Err(e) => {
                    warn!(key = %entry.key, error = %e, "queued upload failed, keeping entry");
                    kept.push(entry);
                }
            }
        }

        let remaining = kept.len();
        self.write_entries(&kept)?;

        debug!(delivered, remaining, "flush finished");
        Ok(FlushReport { delivered, remaining })
    }

    fn read_entries(&self) -> StoreResult<Vec<PendingRecord>> {
        match self.local.get(&self.queue_key)? {
            None => Ok(Vec::new()),
            Some(text) => match serde_json::from_str(&text) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    // A corrupt queue is dropped rather than wedging every
                    // future enqueue; the live records are untouched.
                    warn!(error = %e, "malformed pending queue discarded");
                    Ok(Vec::new())
                }
            },
        }
    }

    fn write_entries(&self, entries: &[PendingRecord]) -> StoreResult<()> {
        if entries.is_empty() {
            return self.local.remove(&self.queue_key);
        }
        let text = serde_json::to_string(entries).map_err(|e| StoreError::WriteFailed {
            key: self.queue_key.clone(),
            reason: format!("queue serialization failed: {}", e),
        })?;
        self.local.put(&self.queue_key, &text)
    }
}
