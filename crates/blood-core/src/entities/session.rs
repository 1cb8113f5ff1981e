//! Session-scoped records kept outside the relational store

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::value_objects::OtpChannel;

/// Identity waiting on an OTP challenge between login and verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub user_id: i64,
    pub channel: OtpChannel,
    pub remember_me: bool,
    /// Post-login redirect captured before the challenge
    pub next: Option<String>,
    /// Unix epoch seconds
    pub created_at: i64,
}

impl PendingLogin {
    pub fn new(user_id: i64, channel: OtpChannel, remember_me: bool, next: Option<String>) -> Self {
        Self {
            user_id,
            channel,
            remember_me,
            next,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Stored refresh token data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub user_id: i64,
    /// Session ID (for tracking multiple sessions per user)
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
    pub remember_me: bool,
}

impl RefreshTokenData {
    pub fn new(user_id: i64, session_id: String, remember_me: bool) -> Self {
        Self {
            user_id,
            session_id,
            created_at: Utc::now().timestamp(),
            remember_me,
        }
    }
}
