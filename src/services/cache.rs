use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Local cache invalidation failed: {0}")]
    LocalInvalidation(#[from] moka::PredicateError),
}

/// Two-tier cache for ranked recommendations
///
/// The local tier is a per-process moka cache holding the serialized JSON;
/// Redis is shared by every instance behind the load balancer. Invalidation
/// only reaches the local tier of the instance that ran it, so local entries
/// live for `local_ttl_secs` (a few seconds) while Redis keeps `ttl_secs`.
pub struct CacheManager {
    redis: ConnectionManager,
    local: moka::future::Cache<String, Arc<str>>,
    ttl_secs: u64,
}

impl CacheManager {
    pub async fn new(
        redis_url: &str,
        local_capacity: u64,
        ttl_secs: u64,
        local_ttl_secs: u64,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = moka::future::Cache::builder()
            .max_capacity(local_capacity)
            .time_to_live(local_ttl(ttl_secs, local_ttl_secs))
            .support_invalidation_closures()
            .build();

        Ok(Self { redis, local, ttl_secs })
    }

    /// Look a key up locally, then in Redis. `None` is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        if let Some(json) = self.local.get(key).await {
            tracing::trace!("Local cache hit: {}", key);
            return Ok(Some(serde_json::from_str(&json)?));
        }

        let mut conn = self.redis.clone();
        let stored: Option<String> = conn.get(key).await?;

        match stored {
            Some(json) => {
                tracing::trace!("Redis cache hit: {}", key);
                let value = serde_json::from_str(&json)?;
                self.local.insert(key.to_string(), Arc::from(json)).await;
                Ok(Some(value))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let mut conn = self.redis.clone();
        let _: () = conn.set_ex(key, &json, self.ttl_secs).await?;

        self.local.insert(key.to_string(), Arc::from(json)).await;
        tracing::trace!("Cached {}", key);
        Ok(())
    }

    /// Drop every entry whose key matches a trailing-`*` glob
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let prefix = pattern.trim_end_matches('*').to_string();
        self.local
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))?;

        let mut conn = self.redis.clone();
        let keys: Vec<String> = redis::cmd("KEYS").arg(pattern).query_async(&mut conn).await?;

        if !keys.is_empty() {
            let _: () = conn.del(&keys).await?;
        }

        tracing::debug!("Invalidated {} redis keys for {}", keys.len(), pattern);
        Ok(())
    }

    /// Entries currently held by the local tier
    pub fn entry_count(&self) -> u64 {
        self.local.entry_count()
    }
}

/// Local entries never outlive the shared ones
fn local_ttl(ttl_secs: u64, local_ttl_secs: u64) -> Duration {
    Duration::from_secs(local_ttl_secs.min(ttl_secs))
}

/// Key layout for cached recommendations
pub struct CacheKey;

impl CacheKey {
    pub fn recommendations(customer_id: &str, limit: usize) -> String {
        format!("recs:{}:{}", customer_id, limit)
    }

    pub fn all_recommendations() -> &'static str {
        "recs:*"
    }
}
