//! Stored record envelope and sync metadata
//!
//! The payload is an opaque JSON value supplied by the caller (a completed
//! exercise session, a profile field); no schema is enforced here. The
//! envelope adds the bookkeeping the hybrid adapter needs: when the record
//! was written, whether a remote write has confirmed it, and the remote's
//! identifier once one exists.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Bookkeeping attached to every stored record
///
/// Not part of the caller-visible payload semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Confirmed by a successful remote write
    pub synced: bool,
    /// Time of the local write
    pub stored_at: DateTime<Utc>,
    /// Identifier assigned by the remote, once known
    pub remote_id: Option<String>,
}

impl SyncMetadata {
    /// Fresh metadata for a record that has only been written locally
    pub fn unsynced() -> Self {
        Self {
            synced: false,
            stored_at: Utc::now(),
            remote_id: None,
        }
    }
}

/// A record as it lives in the stores: opaque payload plus sync metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Caller-supplied JSON payload
    pub payload: Value,
    /// Adapter-owned bookkeeping
    pub meta: SyncMetadata,
}

impl StoredRecord {
    /// Wrap a payload in a fresh, unsynced envelope
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            meta: SyncMetadata::unsynced(),
        }
    }

    /// Serialize to the JSON text the local store holds
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| StoreError::MalformedRecord {
            key: String::new(),
            reason: format!("serialization failed: {}", e),
        })
    }

    /// Parse the JSON text held under `key` in the local store
    pub fn from_json(key: &str, text: &str) -> StoreResult<Self> {
        serde_json::from_str(text).map_err(|e| StoreError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A record waiting in the retry queue for a remote delivery
///
/// Carries a client-generated idempotency key so a flush that is repeated
/// after a partial failure cannot create duplicate remote records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRecord {
    /// Client-generated idempotency key
    pub idempotency_key: Uuid,
    /// The caller key the record belongs under
    pub key: String,
    /// The record as it was when queued
    pub record: StoredRecord,
    /// Time of enqueueing
    pub queued_at: DateTime<Utc>,
}

impl PendingRecord {
    /// Queue entry for a record that failed its remote leg
    pub fn new(key: &str, record: StoredRecord) -> Self {
        Self {
            idempotency_key: Uuid::new_v4(),
            key: key.to_string(),
            record,
            queued_at: Utc::now(),
        }
    }
}
