// src/services/settings.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
struct CachedSetting {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Runtime-tunable configuration backed by the system_settings table, with a
/// short in-process cache and environment-variable fallback.
#[derive(Debug)]
pub struct SettingsService {
    db_pool: SqlitePool,
    cache: Arc<RwLock<HashMap<String, CachedSetting>>>,
    cache_ttl: Duration,
}

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(db_pool: SqlitePool) -> Self {
        Self {
            db_pool,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl: Duration::minutes(5),
        }
    }

    /// Get a setting value by key
    /// Falls back to the matching environment variable if not found in the
    /// database (key uppercased, e.g. `openai_api_key` -> `OPENAI_API_KEY`)
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        // Check cache first
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(key) {
                if cached.expires_at > Utc::now() {
                    debug!(key = %key, "Setting retrieved from cache");
                    return Ok(Some(cached.value.clone()));
                }
            }
        }

        // Query database
        let result: Option<(String,)> =
            sqlx::query_as("SELECT value FROM system_settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.db_pool)
                .await?;

        let value = match result {
            Some((value,)) => Some(value),
            None => env::var(key.to_uppercase()).ok().filter(|v| !v.is_empty()),
        };

        if let Some(value) = &value {
            let mut cache = self.cache.write().await;
            cache.insert(
                key.to_string(),
                CachedSetting {
                    value: value.clone(),
                    expires_at: Utc::now() + self.cache_ttl,
                },
            );
        }

        Ok(value)
    }
}
