//! User entity - the login identity behind a donor or patient profile

use chrono::{DateTime, Utc};

use crate::rules::{account_recovery_window, RecoveryWindow};
use crate::value_objects::Role;

/// User account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Always stored lowercased
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_blocked: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields needed to create a user; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl NewUser {
    /// New self-registered account: role unset, email normalized
    pub fn registration(email: &str, phone: Option<String>) -> Self {
        Self {
            email: normalize_email(email),
            phone,
            role: Role::Unset,
        }
    }
}

/// Lowercase and trim an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Where this account sits relative to the soft-delete recovery window
    pub fn recovery_window(&self, now: DateTime<Utc>) -> RecoveryWindow {
        account_recovery_window(self.deleted_at, now)
    }

    /// Soft delete: stamp `deleted_at` and deactivate
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.is_active = false;
    }

    /// Undo a soft delete
    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.is_active = true;
    }

    pub fn block(&mut self) {
        self.is_blocked = true;
        self.is_active = false;
    }

    pub fn unblock(&mut self) {
        self.is_blocked = false;
        self.is_active = true;
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
    }

    /// Exact phone comparison used by the strict admin login
    pub fn phone_matches(&self, candidate: &str) -> bool {
        self.phone.as_deref() == Some(candidate)
    }
}
