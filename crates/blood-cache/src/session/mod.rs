//! Session storage module.
//!
//! Provides Redis-backed storage for:
//! - Refresh tokens (authentication sessions)
//! - Pending logins (password accepted, OTP outstanding)

mod pending_login;
mod refresh_token;

pub use pending_login::{RedisPendingLoginStore, DEFAULT_PENDING_LOGIN_TTL};
pub use refresh_token::RedisRefreshTokenStore;
