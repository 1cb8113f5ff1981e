//! Session-scoped store traits, implemented over Redis in production

use async_trait::async_trait;

use crate::entities::{PendingLogin, RefreshTokenData};

use super::repositories::RepoResult;

/// Server-side carrier for a login waiting on its OTP challenge
#[async_trait]
pub trait PendingLoginStore: Send + Sync {
    async fn put(&self, token: &str, pending: &PendingLogin) -> RepoResult<()>;

    async fn get(&self, token: &str) -> RepoResult<Option<PendingLogin>>;

    /// Returns `true` if a record was removed
    async fn remove(&self, token: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn store(&self, token: &str, data: &RefreshTokenData, ttl_seconds: u64)
        -> RepoResult<()>;

    /// Stored data, or `None` if the token expired or was revoked
    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshTokenData>>;

    async fn revoke(&self, token: &str) -> RepoResult<bool>;

    /// Revoke every token of a user; returns how many were removed
    async fn revoke_all_for_user(&self, user_id: i64) -> RepoResult<u32>;
}
