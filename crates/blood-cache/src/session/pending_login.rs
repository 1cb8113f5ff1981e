//! Pending login challenges.
//!
//! Between the password step and the OTP step the server keeps who is
//! logging in and on which channel. The client only ever holds the opaque
//! token that names the record.

use async_trait::async_trait;
use blood_core::traits::{PendingLoginStore, RepoResult};
use blood_core::PendingLogin;

use crate::pool::RedisPool;

/// Key prefix for pending login records
const PENDING_LOGIN_PREFIX: &str = "pending_login:";

/// Default lifetime of a pending login (15 minutes)
pub const DEFAULT_PENDING_LOGIN_TTL: u64 = 15 * 60;

/// Redis-backed [`PendingLoginStore`]
#[derive(Clone)]
pub struct RedisPendingLoginStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisPendingLoginStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_PENDING_LOGIN_TTL)
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token: &str) -> String {
        format!("{PENDING_LOGIN_PREFIX}{token}")
    }
}

#[async_trait]
impl PendingLoginStore for RedisPendingLoginStore {
    async fn put(&self, token: &str, pending: &PendingLogin) -> RepoResult<()> {
        self.pool
            .set_json(&Self::key(token), pending, self.ttl_seconds)
            .await?;
        tracing::debug!(
            user_id = pending.user_id,
            channel = ?pending.channel,
            ttl_seconds = self.ttl_seconds,
            "Stored pending login"
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> RepoResult<Option<PendingLogin>> {
        Ok(self.pool.get_json(&Self::key(token)).await?)
    }

    async fn remove(&self, token: &str) -> RepoResult<bool> {
        Ok(self.pool.delete(&Self::key(token)).await?)
    }
}
