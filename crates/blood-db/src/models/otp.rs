//! OTP database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for otps table
#[derive(Debug, Clone, FromRow)]
pub struct OtpModel {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub otp_hash: String,
    pub otp_type: String,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}
