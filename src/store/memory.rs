//! Process-local blob backend.
//!
//! Used by tests and as the fallback when no `DATABASE_URL` is configured.
//! Contents vanish with the process.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{BlobStore, StoreError};

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing any collection.
    pub fn put(&self, key: &str, body: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), body.to_string());
        }
    }

    /// Make every subsequent `save` fail, simulating a full or read-only store.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    async fn save(&self, key: &str, body: &str) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage(format!("write rejected for key {key}")));
        }
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        blobs.insert(key.to_string(), body.to_string());
        Ok(())
    }
}
