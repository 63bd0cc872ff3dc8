//! Postgres blob backend.
//!
//! One row per storage key in the `blobs` table. `save` is an upsert, so the
//! whole JSON array for a key is replaced in a single statement.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{BlobStore, StoreError};

pub struct PgBlobStore {
    pool: PgPool,
}

impl PgBlobStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT body::text FROM blobs WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(body,)| body))
    }

    async fn save(&self, key: &str, body: &str) -> Result<(), StoreError> {
        sqlx::query(
            r"INSERT INTO blobs (key, body, updated_at)
               VALUES ($1, $2::jsonb, now())
               ON CONFLICT (key) DO UPDATE SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at",
        )
        .bind(key)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
