//! Application configuration structs
//!
//! Loads configuration from environment variables (after reading `.env`).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub auth: AuthPolicyConfig,
    pub notification: NotificationConfig,
    pub matching: MatchingConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply embedded migrations at startup
    #[serde(default)]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
    /// Refresh token lifetime when the user asked to be remembered
    #[serde(default = "default_remember_me_expiry")]
    pub remember_me_expiry: i64,
}

/// One-time passcode configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_otp_expiry_minutes")]
    pub expiry_minutes: i64,
    /// Codes an owner may request in any trailing 60 minutes
    #[serde(default = "default_max_otp_requests_per_hour")]
    pub max_requests_per_hour: i64,
    /// How long a login may wait on its OTP challenge
    #[serde(default = "default_pending_login_ttl")]
    pub pending_login_ttl_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: default_otp_expiry_minutes(),
            max_requests_per_hour: default_max_otp_requests_per_hour(),
            pending_login_ttl_secs: default_pending_login_ttl(),
        }
    }
}

/// How admin and sub-admin accounts authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegedLoginPolicy {
    /// Admins must match their phone number and pass an email OTP;
    /// sub-admins pass an OTP on the channel they pick.
    #[default]
    OtpChallenge,
    /// Password only, like every other account
    PasswordOnly,
}

impl FromStr for PrivilegedLoginPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "otp_challenge" | "otp" => Ok(Self::OtpChallenge),
            "password_only" | "password" => Ok(Self::PasswordOnly),
            other => Err(format!("unknown privileged login policy `{other}`")),
        }
    }
}

/// Authentication policy configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPolicyConfig {
    #[serde(default)]
    pub privileged_login: PrivilegedLoginPolicy,
}

/// Outbound notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Notify matching donors/patients when a profile is saved
    #[serde(default = "default_true")]
    pub notify_matches: bool,
    /// Receives privileged login alerts
    #[serde(default)]
    pub admin_email: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            notify_matches: true,
            admin_email: None,
        }
    }
}

/// Matching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Maximum candidates returned on dashboards
    #[serde(default = "default_match_limit")]
    pub match_limit: i64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            match_limit: default_match_limit(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Key clients on `X-Forwarded-For`/`X-Real-IP`/`Forwarded`; only safe
    /// behind a reverse proxy that overwrites them
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "blood-network".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    86_400 // 24 hours
}

fn default_remember_me_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_otp_expiry_minutes() -> i64 {
    10
}

fn default_max_otp_requests_per_hour() -> i64 {
    3
}

fn default_pending_login_ttl() -> u64 {
    900
}

fn default_true() -> bool {
    true
}

fn default_match_limit() -> i64 {
    10
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    30
}

/// Minimum JWT secret length in bytes
const MIN_JWT_SECRET_LEN: usize = 32;

/// Parse an optional variable, falling back to `default` when it is unset
fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        let privileged_login = match lookup("PRIVILEGED_LOGIN_POLICY") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue("PRIVILEGED_LOGIN_POLICY", e))?,
            None => PrivilegedLoginPolicy::default(),
        };

        let otp = OtpConfig {
            expiry_minutes: parse_or(&lookup, "OTP_EXPIRY_MINUTES", default_otp_expiry_minutes())?,
            max_requests_per_hour: parse_or(
                &lookup,
                "MAX_OTP_REQUESTS_PER_HOUR",
                default_max_otp_requests_per_hour(),
            )?,
            pending_login_ttl_secs: parse_or(
                &lookup,
                "OTP_PENDING_LOGIN_TTL_SECS",
                default_pending_login_ttl(),
            )?,
        };
        if otp.expiry_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "OTP_EXPIRY_MINUTES",
                otp.expiry_minutes.to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "API_PORT", default_port())?,
                request_timeout_secs: parse_or(
                    &lookup,
                    "REQUEST_TIMEOUT_SECS",
                    default_request_timeout(),
                )?,
            },
            database: DatabaseConfig {
                url: required(&lookup, "DATABASE_URL")?,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                )?,
                run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", false)?,
            },
            redis: RedisConfig {
                url: lookup("REDIS_URL").unwrap_or_else(default_redis_url),
                max_connections: parse_or(
                    &lookup,
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: parse_or(
                    &lookup,
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry(),
                )?,
                refresh_token_expiry: parse_or(
                    &lookup,
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    default_refresh_token_expiry(),
                )?,
                remember_me_expiry: parse_or(
                    &lookup,
                    "JWT_REMEMBER_ME_EXPIRY",
                    default_remember_me_expiry(),
                )?,
            },
            otp,
            auth: AuthPolicyConfig { privileged_login },
            notification: NotificationConfig {
                notify_matches: parse_or(&lookup, "NOTIFY_MATCHES", true)?,
                admin_email: lookup("ADMIN_NOTIFY_EMAIL").filter(|s| !s.trim().is_empty()),
            },
            matching: MatchingConfig {
                match_limit: parse_or(&lookup, "MATCH_LIMIT", default_match_limit())?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or(
                    &lookup,
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                )?,
                burst: parse_or(&lookup, "RATE_LIMIT_BURST", default_burst())?,
                trust_proxy_headers: parse_or(&lookup, "RATE_LIMIT_TRUST_PROXY", false)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
