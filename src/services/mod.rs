//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic over the record collections and the
//! model client so route handlers stay focused on request translation and
//! status mapping.

pub mod retry;
pub mod sessions;
pub mod templates;
pub mod trainer;
