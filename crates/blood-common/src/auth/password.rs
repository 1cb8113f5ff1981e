//! Secret hashing with Argon2id
//!
//! Passwords and one-time codes share the same salted, self-describing PHC
//! hash format so neither is ever stored in plaintext.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Accepted password length range, in characters
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing failed: {e}")))
}

fn verify_secret(secret: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_secret(password)
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify_secret(password, hash)
}

/// Hash a one-time code with a fresh salt
pub fn hash_otp_code(code: &str) -> Result<String, AppError> {
    hash_secret(code)
}

/// Compare a submitted one-time code against its stored hash
pub fn verify_otp_code(code: &str, hash: &str) -> Result<bool, AppError> {
    verify_secret(code.trim(), hash)
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
    }
}

/// Validate password length
///
/// # Errors
/// Returns a validation error if the password is too short or too long
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        )));
    }
    if password.trim().is_empty() {
        return Err(AppError::Validation("Password cannot be blank".to_string()));
    }
    Ok(())
}
