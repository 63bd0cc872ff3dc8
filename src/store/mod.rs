//! Keyed record store over JSON-array blobs.
//!
//! DESIGN
//! ======
//! Each entity type lives in one blob under a fixed key, serialized as a
//! JSON array in insertion order. A [`Collection`] hydrates that array into
//! memory once and then serves reads from memory.
//!
//! Mutations hold the collection's write lock across the whole
//! read-modify-write: the change is applied to a copy, the copy is encoded
//! and saved through the [`BlobStore`], and only then swapped in. Two
//! concurrent writers therefore never interleave, and a rejected save leaves
//! the in-memory list exactly as it was.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ErrorCode;

pub use memory::MemoryBlobStore;
pub use postgres::PgBlobStore;

/// Storage key for workout sessions.
pub const SESSIONS_KEY: &str = "workout-sessions";
/// Storage key for exercise templates.
pub const TEMPLATES_KEY: &str = "workout-templates";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Storage(_) => "E_STORAGE",
            Self::Encode(_) => "E_ENCODE",
        }
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// Key-value backend holding one serialized blob per key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`. `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend rejects the read.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend rejects the write.
    async fn save(&self, key: &str, body: &str) -> Result<(), StoreError>;
}

// =============================================================================
// RECORDS
// =============================================================================

/// Anything stored in a [`Collection`]: serializable and addressed by id.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Record for crate::workout::WorkoutSession {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for crate::workout::ExerciseTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Serialize a record list into its blob form.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if a record fails to serialize.
pub fn encode<T: Record>(records: &[T]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(records)?)
}

/// Parse a blob back into a record list, preserving order.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if the blob is not a JSON array of `T`.
pub fn decode<T: Record>(body: &str) -> Result<Vec<T>, StoreError> {
    Ok(serde_json::from_str(body)?)
}

// =============================================================================
// COLLECTION
// =============================================================================

/// In-memory, write-through view of one blob.
pub struct Collection<T: Record> {
    key: &'static str,
    backend: Arc<dyn BlobStore>,
    records: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    /// Load the blob under `key` into memory.
    ///
    /// A blob that fails to decode is logged and treated as empty; it is left
    /// in place until the next successful mutation overwrites it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the backend read fails.
    pub async fn open(key: &'static str, backend: Arc<dyn BlobStore>) -> Result<Self, StoreError> {
        let records = match backend.load(key).await? {
            Some(body) => decode::<T>(&body).unwrap_or_else(|e| {
                warn!(key, error = %e, "store: blob failed to decode, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        info!(key, count = records.len(), "store: collection loaded");
        Ok(Self { key, backend, records: RwLock::new(records) })
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns a storage or encode error if the write-through fails.
    pub async fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut guard = self.records.write().await;
        let mut next = guard.clone();
        next.push(record.clone());
        self.commit(&mut guard, next).await?;
        Ok(record)
    }

    /// Mutate the record with `id` in place and return the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `id`.
    pub async fn update<F>(&self, id: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.records.write().await;
        let mut next = guard.clone();
        let record = next
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(record);
        let updated = record.clone();
        self.commit(&mut guard, next).await?;
        Ok(updated)
    }

    /// Remove the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `id`.
    pub async fn remove(&self, id: &str) -> Result<T, StoreError> {
        let mut guard = self.records.write().await;
        let Some(index) = guard.iter().position(|r| r.id() == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let mut next = guard.clone();
        let removed = next.remove(index);
        self.commit(&mut guard, next).await?;
        Ok(removed)
    }

    /// Current blob form of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if a record fails to serialize.
    pub async fn snapshot(&self) -> Result<String, StoreError> {
        let records = self.records.read().await;
        encode::<T>(records.as_slice())
    }

    async fn commit(&self, guard: &mut Vec<T>, next: Vec<T>) -> Result<(), StoreError> {
        let body = encode::<T>(&next)?;
        self.backend.save(self.key, &body).await?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
