//! # blood-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_otp_code, hash_password, validate_password_strength, verify_otp_code, verify_password,
    Claims, JwtService, PasswordService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, AuthPolicyConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, MatchingConfig, NotificationConfig, OtpConfig,
    PrivilegedLoginPolicy, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use error::{domain_status, AppError};
pub use telemetry::{
    init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
