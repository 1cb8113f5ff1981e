//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    Donor, DonorProfile, Feedback, NewFeedback, NewOtp, NewUser, Otp, Patient, PatientProfile,
    User,
};
use crate::error::DomainError;
use crate::value_objects::{BloodGroup, OtpOwner, OtpPurpose, Role};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Limit/offset window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const MAX_LIMIT: i64 = 100;

    /// Page from a 1-based page number
    pub fn new(page: i64, per_page: i64) -> Self {
        let limit = per_page.clamp(1, Self::MAX_LIMIT);
        Self {
            limit,
            offset: (page.max(1) - 1) * limit,
        }
    }

    pub fn first(limit: i64) -> Self {
        Self::new(1, limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(10)
    }
}

// ============================================================================
// User Repository
// ============================================================================

/// Filter for admin user listings
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub role: Option<Role>,
    /// Case-insensitive substring of the email
    pub search: Option<String>,
    pub page: Page,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find user by email (callers pass the normalized form)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Persist every mutable column of an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>>;

    /// List users, newest first
    async fn list(&self, query: &UserQuery) -> RepoResult<Vec<User>>;

    /// Count all users
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Donor Repository
// ============================================================================

/// Donor search filter
///
/// An empty `blood_groups` list matches nothing. City and state are
/// case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct DonorSearch {
    pub blood_groups: Vec<BloodGroup>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub available_only: bool,
    /// Only donors who never donated or last donated on or before this date
    pub last_donation_on_or_before: Option<NaiveDate>,
    pub page: Page,
}

#[async_trait]
pub trait DonorRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Donor>>;

    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Donor>>;

    async fn create(&self, user_id: i64, profile: &DonorProfile) -> RepoResult<Donor>;

    async fn update(&self, donor: &Donor) -> RepoResult<()>;

    /// Search donors in stable (id) order
    async fn search(&self, query: &DonorSearch) -> RepoResult<Vec<Donor>>;

    /// List all donors, newest first
    async fn list(&self, page: Page) -> RepoResult<Vec<Donor>>;

    async fn count(&self) -> RepoResult<i64>;

    async fn count_available(&self) -> RepoResult<i64>;

    /// Donor count per blood group (groups without donors are omitted)
    async fn count_by_blood_group(&self) -> RepoResult<Vec<(BloodGroup, i64)>>;
}

// ============================================================================
// Patient Repository
// ============================================================================

/// Patient search filter
#[derive(Debug, Clone, Default)]
pub struct PatientSearch {
    pub blood_groups: Vec<BloodGroup>,
    pub city: Option<String>,
    pub unfulfilled_only: bool,
    /// Only requests still due on or after this date
    pub required_by_on_or_after: Option<NaiveDate>,
    pub page: Page,
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Patient>>;

    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Patient>>;

    async fn create(&self, user_id: i64, profile: &PatientProfile) -> RepoResult<Patient>;

    async fn update(&self, patient: &Patient) -> RepoResult<()>;

    /// Search patients in stable (id) order
    async fn search(&self, query: &PatientSearch) -> RepoResult<Vec<Patient>>;

    /// List all patients, newest first
    async fn list(&self, page: Page) -> RepoResult<Vec<Patient>>;

    async fn count(&self) -> RepoResult<i64>;

    async fn count_fulfilled(&self) -> RepoResult<i64>;
}

// ============================================================================
// OTP Repository
// ============================================================================

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Count records created for `owner` at or after `since`
    async fn count_created_since(&self, owner: &OtpOwner, since: DateTime<Utc>) -> RepoResult<i64>;

    /// Mark every unused record of `owner` as used and insert `otp`, atomically
    async fn replace(&self, owner: &OtpOwner, otp: &NewOtp) -> RepoResult<Otp>;

    /// Most recently created unused record for `owner` and `purpose`
    async fn latest_unused(&self, owner: &OtpOwner, purpose: OtpPurpose)
        -> RepoResult<Option<Otp>>;

    /// Consume a record; returns `false` if it was already used
    async fn mark_used(&self, id: i64) -> RepoResult<bool>;
}

// ============================================================================
// Feedback Repository
// ============================================================================

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: &NewFeedback) -> RepoResult<Feedback>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Feedback>>;

    async fn update(&self, feedback: &Feedback) -> RepoResult<()>;

    /// List feedback, newest first, optionally filtered by resolution
    async fn list(&self, resolved: Option<bool>, page: Page) -> RepoResult<Vec<Feedback>>;

    async fn count_unresolved(&self) -> RepoResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Page::new(1, 10), Page { limit: 10, offset: 0 });
        assert_eq!(Page::new(3, 10), Page { limit: 10, offset: 20 });
        assert_eq!(Page::new(0, 10).offset, 0);
        assert_eq!(Page::new(1, 1000).limit, Page::MAX_LIMIT);
    }
}
