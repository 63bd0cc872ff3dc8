//! Server configuration parsed from environment variables.
//!
//! Every knob has a default so the server starts with no environment at
//! all: in-memory storage, port 3000, trainer disabled until an API key
//! appears. LLM provider settings live in [`crate::llm::config`].

use std::time::Duration;

use crate::services::retry::RetryPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_TRAINER_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TRAINER_BASE_DELAY_MS: u64 = 1000;
pub const DEFAULT_TRAINER_ATTEMPT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TRAINER_MAX_TOKENS: u32 = 2048;

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub attempt_timeout_ms: u64,
    pub max_tokens: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_TRAINER_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_TRAINER_BASE_DELAY_MS,
            attempt_timeout_ms: DEFAULT_TRAINER_ATTEMPT_TIMEOUT_MS,
            max_tokens: DEFAULT_TRAINER_MAX_TOKENS,
        }
    }
}

impl TrainerConfig {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// `None` selects the in-memory blob store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub trainer: TrainerConfig,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// - `PORT` (default 3000)
    /// - `DATABASE_URL` (optional)
    /// - `DB_MAX_CONNECTIONS` (default 5)
    /// - `TRAINER_MAX_ATTEMPTS` (default 3, minimum 1)
    /// - `TRAINER_BASE_DELAY_MS` (default 1000)
    /// - `TRAINER_ATTEMPT_TIMEOUT_MS` (default 30000)
    /// - `TRAINER_MAX_TOKENS` (default 2048)
    ///
    /// Unparsable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            trainer: TrainerConfig {
                max_attempts: env_parse("TRAINER_MAX_ATTEMPTS", DEFAULT_TRAINER_MAX_ATTEMPTS).max(1),
                base_delay_ms: env_parse("TRAINER_BASE_DELAY_MS", DEFAULT_TRAINER_BASE_DELAY_MS),
                attempt_timeout_ms: env_parse("TRAINER_ATTEMPT_TIMEOUT_MS", DEFAULT_TRAINER_ATTEMPT_TIMEOUT_MS),
                max_tokens: env_parse("TRAINER_MAX_TOKENS", DEFAULT_TRAINER_MAX_TOKENS),
            },
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
