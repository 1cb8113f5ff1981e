//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use blood_core::traits::Page;
use blood_core::{BloodGroup, OtpChannel, Role, UrgencyLevel};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

fn default_true() -> bool {
    true
}

fn default_units() -> i32 {
    1
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 7, max = 20, message = "Phone must be 7-20 characters"))]
    pub phone: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Required for administrator accounts under the OTP challenge policy
    pub phone: Option<String>,

    /// Where a sub-admin wants the login code sent
    #[serde(default)]
    pub otp_channel: OtpChannel,

    #[serde(default)]
    pub remember_me: bool,

    /// Post-login redirect captured before the flow began
    #[validate(length(max = 512))]
    pub next: Option<String>,
}

/// Second step of an OTP-gated login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyLoginOtpRequest {
    #[validate(length(min = 1, message = "Pending token is required"))]
    pub pending_token: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Reactivate a soft-deleted account inside its recovery window
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecoverAccountRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SelectRoleRequest {
    pub role: Role,
}

// ============================================================================
// Donor Requests
// ============================================================================

/// Create or update the caller's donor profile
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DonorProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Full name must be 2-100 characters"))]
    pub full_name: String,

    pub blood_group: BloodGroup,

    pub date_of_birth: NaiveDate,

    #[validate(length(min = 1, max = 10))]
    pub gender: String,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(length(min = 2, max = 50, message = "City must be 2-50 characters"))]
    pub city: String,

    #[validate(length(min = 2, max = 50, message = "State must be 2-50 characters"))]
    pub state: String,

    #[validate(length(min = 4, max = 10, message = "Pincode must be 4-10 characters"))]
    pub pincode: String,

    pub last_donation_date: Option<NaiveDate>,

    #[serde(default = "default_true")]
    pub is_available: bool,

    #[validate(length(max = 2000))]
    pub medical_history: Option<String>,
}

/// Set availability explicitly, or flip it when omitted
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: Option<bool>,
}

/// Record a donation; defaults to today
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecordDonationRequest {
    pub donation_date: Option<NaiveDate>,
}

// ============================================================================
// Patient Requests
// ============================================================================

/// Create or update the caller's patient profile
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PatientProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Full name must be 2-100 characters"))]
    pub full_name: String,

    pub blood_group_required: BloodGroup,

    #[serde(default = "default_units")]
    #[validate(range(min = 1, max = 50, message = "Units required must be 1-50"))]
    pub units_required: i32,

    #[validate(length(min = 2, max = 200, message = "Hospital name must be 2-200 characters"))]
    pub hospital_name: String,

    #[validate(length(max = 500))]
    pub location: Option<String>,

    #[validate(length(min = 2, max = 50, message = "City must be 2-50 characters"))]
    pub city: String,

    #[validate(length(min = 2, max = 50, message = "State must be 2-50 characters"))]
    pub state: String,

    #[validate(length(min = 4, max = 10, message = "Pincode must be 4-10 characters"))]
    pub pincode: Option<String>,

    #[serde(default)]
    pub urgency_level: UrgencyLevel,

    pub required_by_date: NaiveDate,

    #[validate(length(max = 2000))]
    pub medical_condition: Option<String>,
}

/// Donor search filters for a patient
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DonorSearchQuery {
    /// Exact group; the patient's compatible groups when omitted
    pub blood_group: Option<BloodGroup>,

    #[validate(length(max = 50))]
    pub city: Option<String>,

    #[validate(length(max = 50))]
    pub state: Option<String>,

    pub available_only: Option<bool>,

    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<i64>,
}

// ============================================================================
// Listing / Admin Requests
// ============================================================================

/// Page-number pagination
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PaginationQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<i64>,
}

impl PaginationQuery {
    pub const DEFAULT_PER_PAGE: i64 = 10;

    pub fn page(&self) -> Page {
        Page::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE),
        )
    }
}

/// Admin user listing filter
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserListQuery {
    pub role: Option<Role>,

    #[validate(length(max = 254))]
    pub search: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationQuery,
}

/// Admin feedback listing filter
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct FeedbackListQuery {
    pub resolved: Option<bool>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationQuery,
}

/// Admin edit of another account
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Phone must be 7-20 characters"))]
    pub phone: Option<String>,

    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackReplyRequest {
    #[validate(length(min = 1, max = 2000, message = "Response must be 1-2000 characters"))]
    pub response: String,
}

// ============================================================================
// Feedback Requests
// ============================================================================

/// Public feedback submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 5, max = 200, message = "Subject must be 5-200 characters"))]
    pub subject: String,

    #[validate(length(min = 10, max = 2000, message = "Message must be 10-2000 characters"))]
    pub message: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_request_validation() {
        let mut request = FeedbackRequest {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            subject: "Thanks a lot".to_string(),
            message: "The donor search saved us hours.".to_string(),
            rating: Some(5),
        };
        assert!(request.validate().is_ok());

        request.rating = Some(6);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_defaults() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@example.com","password":"secret"}"#).unwrap();
        assert_eq!(request.otp_channel, OtpChannel::Email);
        assert!(!request.remember_me);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_patient_profile_defaults() {
        let request: PatientProfileRequest = serde_json::from_str(
            r#"{"full_name":"Asha","blood_group_required":"AB+","hospital_name":"City Hospital",
                "city":"Pune","state":"MH","required_by_date":"2030-01-01"}"#,
        )
        .unwrap();
        assert_eq!(request.units_required, 1);
        assert_eq!(request.urgency_level, UrgencyLevel::Normal);
        assert_eq!(request.blood_group_required, BloodGroup::AbPositive);
    }

    #[test]
    fn test_pagination_defaults() {
        let page = PaginationQuery::default().page();
        assert_eq!(page, Page { limit: 10, offset: 0 });
    }
}
