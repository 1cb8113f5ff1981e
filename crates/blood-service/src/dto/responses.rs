//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use std::collections::BTreeMap;

use blood_common::TokenPair;
use blood_core::{BloodGroup, OtpChannel, Role, UrgencyLevel};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Page-number paginated response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, per_page: i64) -> Self {
        let has_more = i64::try_from(data.len()).is_ok_and(|len| len >= per_page);
        Self {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                has_more,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    /// Whether a further page may exist
    pub has_more: bool,
}

/// Plain acknowledgement for state-changing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: UserResponse) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            refresh_expires_in: tokens.refresh_expires_in,
            user,
        }
    }
}

/// Where the client should take an authenticated user next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    SelectRole,
    CompleteProfile { role: Role },
    Dashboard { role: Role },
    /// Post-login redirect captured before the flow began
    Redirect { url: String },
}

/// Result of a login attempt that was not rejected
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Authenticated {
        #[serde(flatten)]
        auth: AuthResponse,
        destination: Destination,
    },
    /// A code was sent; finish with `verify-otp`
    OtpRequired {
        pending_token: String,
        channel: OtpChannel,
        /// Masked destination for display
        sent_to: String,
        expires_at: DateTime<Utc>,
    },
    /// The account is soft-deleted but can still be recovered
    Recoverable {
        email: String,
        days_since_deletion: i64,
        days_left: i64,
    },
}

/// Reply to a role change
#[derive(Debug, Serialize)]
pub struct RoleChangeResponse {
    pub role: Role,
    pub destination: Destination,
    /// Fresh tokens carrying the new role claim
    #[serde(flatten)]
    pub auth: AuthResponse,
}

// ============================================================================
// User Responses
// ============================================================================

/// Account as seen by its owner or an administrator
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// `GET /auth/me`
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor: Option<DonorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientResponse>,
}

// ============================================================================
// Donor / Patient Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DonorResponse {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group: BloodGroup,
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_donation_date: Option<NaiveDate>,
    pub is_available: bool,
    pub can_donate: bool,
    pub days_until_eligible: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Donor as shown to a patient
#[derive(Debug, Clone, Serialize)]
pub struct DonorDetailResponse {
    #[serde(flatten)]
    pub donor: DonorResponse,
    /// Whether this donor can give to the viewing patient
    pub is_compatible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientResponse {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group_required: BloodGroup,
    pub units_required: i32,
    pub hospital_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub urgency_level: UrgencyLevel,
    pub required_by_date: NaiveDate,
    pub days_remaining: i64,
    pub is_urgent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_condition: Option<String>,
    pub is_fulfilled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reply to a donor profile save
#[derive(Debug, Serialize)]
pub struct DonorProfileSaved {
    pub donor: DonorResponse,
    /// Urgent compatible patients told about this donor
    pub patients_notified: usize,
}

/// Reply to a patient profile save
#[derive(Debug, Serialize)]
pub struct PatientProfileSaved {
    pub patient: PatientResponse,
    /// Compatible donors told about this request
    pub donors_notified: usize,
}

// ============================================================================
// Statistics / Reference Responses
// ============================================================================

/// Admin dashboard counters
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub total_users: i64,
    pub total_donors: i64,
    pub available_donors: i64,
    pub total_patients: i64,
    pub fulfilled_patients: i64,
    pub open_feedback: i64,
    /// Donors per blood group; every group is present
    pub blood_group_distribution: BTreeMap<BloodGroup, i64>,
}

/// Forward and inverse compatibility tables
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityChart {
    pub can_donate_to: BTreeMap<BloodGroup, Vec<BloodGroup>>,
    pub can_receive_from: BTreeMap<BloodGroup, Vec<BloodGroup>>,
}

// ============================================================================
// Feedback Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i16>,
    pub is_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing store
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
