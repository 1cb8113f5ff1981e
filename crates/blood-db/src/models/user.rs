//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
///
/// The password hash is read through its own query and never loaded here.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_blocked: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserModel {
    /// Check if user is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
