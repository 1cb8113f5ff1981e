//! Refresh token storage in Redis.
//!
//! Each token lives under its own key with the TTL chosen at login, and is
//! also indexed in a per-user set so every session can be revoked at once.

use async_trait::async_trait;
use blood_core::traits::{RefreshTokenStore, RepoResult};
use blood_core::RefreshTokenData;

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for refresh tokens
const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";

/// Key prefix for the per-user token index
const USER_TOKENS_PREFIX: &str = "user_tokens:";

/// Refresh token store for managing authentication sessions
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    pool: RedisPool,
}

impl RedisRefreshTokenStore {
    /// Create a new refresh token store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for a refresh token
    fn key(token: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token}")
    }

    fn user_key(user_id: i64) -> String {
        format!("{USER_TOKENS_PREFIX}{user_id}")
    }

    async fn store_inner(
        &self,
        token: &str,
        data: &RefreshTokenData,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        self.pool
            .set_json(&Self::key(token), data, ttl_seconds)
            .await?;

        // Stale members are skipped on revoke
        self.pool
            .index_member(&Self::user_key(data.user_id), token, ttl_seconds)
            .await?;

        tracing::debug!(
            user_id = data.user_id,
            session_id = %data.session_id,
            remember_me = data.remember_me,
            ttl_seconds,
            "Stored refresh token"
        );

        Ok(())
    }

    async fn revoke_inner(&self, token: &str) -> RedisResult<bool> {
        if let Some(data) = self.pool.get_json::<RefreshTokenData>(&Self::key(token)).await? {
            self.pool
                .unindex_member(&Self::user_key(data.user_id), token)
                .await?;
        }

        let deleted = self.pool.delete(&Self::key(token)).await?;
        if deleted {
            tracing::debug!("Revoked refresh token");
        }
        Ok(deleted)
    }

    async fn revoke_all_inner(&self, user_id: i64) -> RedisResult<u32> {
        let tokens = self.pool.drain_set(&Self::user_key(user_id)).await?;
        let keys: Vec<String> = tokens.iter().map(|t| Self::key(t)).collect();
        let count = self.pool.delete_many(&keys).await?;

        tracing::info!(user_id, count, "Revoked all refresh tokens for user");
        Ok(count)
    }
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn store(
        &self,
        token: &str,
        data: &RefreshTokenData,
        ttl_seconds: u64,
    ) -> RepoResult<()> {
        Ok(self.store_inner(token, data, ttl_seconds).await?)
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshTokenData>> {
        Ok(self.pool.get_json(&Self::key(token)).await?)
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.revoke_inner(token).await?)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> RepoResult<u32> {
        Ok(self.revoke_all_inner(user_id).await?)
    }
}
