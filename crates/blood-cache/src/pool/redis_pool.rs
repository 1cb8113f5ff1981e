//! Pooled Redis access for the session stores.
//!
//! Values are JSON strings under expiring keys; per-user indexes are sets
//! whose expiry only ever grows.

use blood_core::DomainError;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

/// Redis pool configuration
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 16,
        }
    }
}

impl From<&blood_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &blood_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

/// Error type for Redis pool operations
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Failed to get connection from pool: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TTL out of range: {0}")]
    InvalidTtl(u64),
}

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool with the given configuration
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        tracing::info!(
            url = %safe_url,
            max_connections = config.max_connections,
            "Redis pool created"
        );

        Ok(Self { pool })
    }

    /// Create a new Redis pool from blood-common config
    pub fn from_config(config: &blood_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(RedisPoolError::GetConnection)
    }

    /// Check if the pool is healthy by pinging Redis
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// Store a JSON value that expires after `ttl_seconds`
    pub async fn set_json<V: serde::Serialize>(
        &self,
        key: &str,
        value: &V,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        if ttl_seconds == 0 {
            return Err(RedisPoolError::InvalidTtl(ttl_seconds));
        }
        let serialized = serde_json::to_string(value)?;
        let mut conn = self.get().await?;
        conn.set_ex::<_, _, ()>(key, &serialized, ttl_seconds).await?;
        Ok(())
    }

    /// Get a JSON value by key
    pub async fn get_json<V: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> RedisResult<Option<V>> {
        let mut conn = self.get().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    /// Delete a key
    pub async fn delete(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.get().await?;
        let deleted: i32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    /// Delete every key in `keys`, returning how many existed
    pub async fn delete_many(&self, keys: &[String]) -> RedisResult<u32> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.get().await?;
        let deleted: u32 = conn.del(keys).await?;
        Ok(deleted)
    }

    /// Add `member` to the set at `set_key`, stretching the set's expiry to
    /// at least `ttl_seconds` so it outlives the member it indexes
    pub async fn index_member(
        &self,
        set_key: &str,
        member: &str,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        let ttl = i64::try_from(ttl_seconds).map_err(|_| RedisPoolError::InvalidTtl(ttl_seconds))?;
        let mut conn = self.get().await?;
        conn.sadd::<_, _, ()>(set_key, member).await?;
        let current: i64 = conn.ttl(set_key).await?;
        if current < ttl {
            conn.expire::<_, ()>(set_key, ttl).await?;
        }
        Ok(())
    }

    /// Remove `member` from the set at `set_key`
    pub async fn unindex_member(&self, set_key: &str, member: &str) -> RedisResult<()> {
        let mut conn = self.get().await?;
        conn.srem::<_, _, ()>(set_key, member).await?;
        Ok(())
    }

    /// Read and delete the whole set at `set_key`
    pub async fn drain_set(&self, set_key: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.get().await?;
        let members: Vec<String> = conn.smembers(set_key).await?;
        conn.del::<_, ()>(set_key).await?;
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_redis() {
        let config = RedisPoolConfig::default();
        assert!(config.url.starts_with("redis://127.0.0.1"));
        assert!(config.max_connections > 0);
    }

    #[test]
    fn test_unreachable_redis_still_builds_lazily() {
        let pool = RedisPool::new(RedisPoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_connections: 2,
        });
        assert!(pool.is_ok());
    }

    #[test]
    fn test_config_from_redis_config() {
        let redis_config = blood_common::RedisConfig {
            url: "redis://localhost:6380".to_string(),
            max_connections: 32,
        };
        let pool_config = RedisPoolConfig::from(&redis_config);
        assert_eq!(pool_config.url, "redis://localhost:6380");
        assert_eq!(pool_config.max_connections, 32);
    }

    #[test]
    fn test_pool_errors_surface_as_cache_errors() {
        let err = DomainError::from(RedisPoolError::InvalidTtl(0));
        assert_eq!(err.code(), "CACHE_ERROR");
    }
}
