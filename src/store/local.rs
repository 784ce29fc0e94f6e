//! Local storage backends
//!
//! The local store is the unconditional leg of every save: a synchronous
//! key/value map holding JSON text, durable across restarts (for the file
//! backend). Two implementations are provided:
//! - [`MemoryStore`] - in-process map, for tests and ephemeral use
//! - [`FileStore`] - one file per key under a base directory, with atomic
//!   writes (temp file + rename)

use crate::error::{StoreError, StoreResult};
use crate::store::constants;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Synchronous key/value store holding JSON text
///
/// Values are opaque strings to the store; the sync layer owns their shape.
/// Implementations must tolerate concurrent sharing (`Send + Sync`), but no
/// cross-key transactions or locking are offered: the last writer wins.
pub trait LocalStore: Send + Sync {
    /// Store a value under a key, replacing any prior value
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Retrieve the value under a key, `None` if absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove the value under a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check whether a key holds a value
    fn contains(&self, key: &str) -> StoreResult<bool>;
}

/// In-memory local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        if value.len() > constants::MAX_VALUE_SIZE {
            return Err(StoreError::QuotaExceeded);
        }
        let mut data = self.data.write().map_err(|_| StoreError::WriteFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self.data.read().map_err(|_| StoreError::ReadFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        Ok(data.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::WriteFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        data.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        let data = self.data.read().map_err(|_| StoreError::ReadFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        Ok(data.contains_key(key))
    }
}

/// File store configuration
#[derive(Debug, Clone)]
pub struct FileConfig {
    /// Base directory for storage
    pub base_path: PathBuf,
    /// Create the base directory if it doesn't exist
    pub create_dirs: bool,
    /// Use atomic writes (write to temp file, then rename)
    pub atomic_writes: bool,
    /// Maximum value size (bytes)
    pub max_value_size: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./matemagica_data"),
            create_dirs: true,
            atomic_writes: true,
            max_value_size: constants::MAX_VALUE_SIZE,
        }
    }
}

/// File-backed local store, one `<key>.json` file per key
pub struct FileStore {
    config: FileConfig,
}

impl FileStore {
    /// Create a new file store, preparing the base directory
    pub fn new(config: FileConfig) -> StoreResult<Self> {
        if config.create_dirs && !config.base_path.exists() {
            fs::create_dir_all(&config.base_path).map_err(|e| StoreError::WriteFailed {
                key: config.base_path.display().to_string(),
                reason: format!("failed to create base directory: {}", e),
            })?;
        }

        if !config.base_path.is_dir() {
            return Err(StoreError::WriteFailed {
                key: config.base_path.display().to_string(),
                reason: "base path is not a directory".to_string(),
            });
        }

        Ok(Self { config })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.config.base_path.join(format!("{}.json", key))
    }

    fn write_file(&self, key: &str, path: &Path, value: &str) -> StoreResult<()> {
        let write_to = |target: &Path| -> std::io::Result<()> {
            let file = File::create(target)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()
        };

        if self.config.atomic_writes {
            let temp_path = path.with_extension("tmp");
            write_to(&temp_path).map_err(|e| StoreError::WriteFailed {
                key: key.to_string(),
                reason: format!("failed to write temp file: {}", e),
            })?;
            fs::rename(&temp_path, path).map_err(|e| StoreError::WriteFailed {
                key: key.to_string(),
                reason: format!("failed to rename temp file: {}", e),
            })?;
        } else {
            write_to(path).map_err(|e| StoreError::WriteFailed {
                key: key.to_string(),
                reason: format!("failed to write file: {}", e),
            })?;
        }

        Ok(())
    }
}

impl LocalStore for FileStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        if value.len() > self.config.max_value_size {
            return Err(StoreError::QuotaExceeded);
        }
        self.write_file(key, &self.path_for(key), value)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(|e| StoreError::ReadFailed {
            key: key.to_string(),
            reason: format!("failed to read file: {}", e),
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| StoreError::WriteFailed {
            key: key.to_string(),
            reason: format!("failed to remove file: {}", e),
        })
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.path_for(key).exists())
    }
}
