//! JWT utilities for authentication
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken` crate.

use blood_core::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at issue time; authorization re-reads the account
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
    pub session_id: String,
}

impl Claims {
    /// Get the user ID
    ///
    /// # Errors
    /// Returns an error if the subject is not a numeric id
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse::<i64>().map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    #[must_use]
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Token pair containing access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    remember_me_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry times (seconds)
    #[must_use]
    pub fn new(
        secret: &str,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
        remember_me_expiry: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
            remember_me_expiry,
        }
    }

    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_expiry,
            config.refresh_token_expiry,
            config.remember_me_expiry,
        )
    }

    /// Refresh token lifetime in seconds
    #[must_use]
    pub fn refresh_expiry(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_me_expiry
        } else {
            self.refresh_token_expiry
        }
    }

    /// Generate a token pair for a login session
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_token_pair(
        &self,
        user_id: i64,
        role: Role,
        session_id: &str,
        remember_me: bool,
    ) -> Result<TokenPair, AppError> {
        let refresh_expiry = self.refresh_expiry(remember_me);
        let access_token = self.encode_token(
            user_id,
            role,
            TokenType::Access,
            session_id,
            self.access_token_expiry,
        )?;
        let refresh_token =
            self.encode_token(user_id, role, TokenType::Refresh, session_id, refresh_expiry)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            refresh_expires_in: refresh_expiry,
        })
    }

    fn encode_token(
        &self,
        user_id: i64,
        role: Role,
        token_type: TokenType,
        session_id: &str,
        expiry: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type,
            session_id: session_id.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    /// Validate an access token and return the claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if !claims.is_access_token() {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validate a refresh token and return the claims
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if !claims.is_refresh_token() {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("remember_me_expiry", &self.remember_me_expiry)
            .finish_non_exhaustive()
    }
}
