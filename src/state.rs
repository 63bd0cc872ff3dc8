//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds one in-memory collection per record type, both backed by the
//! same blob store, and the AI trainer when a model is configured.

use std::sync::Arc;

use crate::services::sessions::Sessions;
use crate::services::templates::Templates;
use crate::services::trainer::AiTrainer;
use crate::store::{BlobStore, Collection, SESSIONS_KEY, StoreError, TEMPLATES_KEY};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Sessions>,
    pub templates: Arc<Templates>,
    /// `None` when no model API key is configured.
    pub trainer: Option<Arc<AiTrainer>>,
}

impl AppState {
    /// Hydrate both collections from `backend`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    pub async fn open(backend: Arc<dyn BlobStore>, trainer: Option<Arc<AiTrainer>>) -> Result<Self, StoreError> {
        let sessions = Collection::open(SESSIONS_KEY, backend.clone()).await?;
        let templates = Collection::open(TEMPLATES_KEY, backend).await?;
        Ok(Self { sessions: Arc::new(sessions), templates: Arc::new(templates), trainer })
    }
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
