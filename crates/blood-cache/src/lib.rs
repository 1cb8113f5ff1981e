//! # blood-cache
//!
//! Redis layer for short-lived authentication state.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Refresh Tokens**: Issued refresh tokens with per-login TTL
//! - **Pending Logins**: The server-side half of the OTP login challenge
//!
//! ## Example
//!
//! ```ignore
//! use blood_cache::{RedisPool, RedisPendingLoginStore, RedisRefreshTokenStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let pending = RedisPendingLoginStore::with_ttl(pool.clone(), config.otp.pending_login_ttl_secs);
//! let refresh = RedisRefreshTokenStore::new(pool);
//! ```

pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export session types
pub use session::{RedisPendingLoginStore, RedisRefreshTokenStore, DEFAULT_PENDING_LOGIN_TTL};
