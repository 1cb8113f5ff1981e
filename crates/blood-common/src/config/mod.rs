//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthPolicyConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, MatchingConfig, NotificationConfig, OtpConfig,
    PrivilegedLoginPolicy, RateLimitConfig, RedisConfig, ServerConfig,
};
