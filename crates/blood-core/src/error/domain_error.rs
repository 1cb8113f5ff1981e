//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Role;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Donor not found: {0}")]
    DonorNotFound(i64),

    #[error("Patient not found: {0}")]
    PatientNotFound(i64),

    #[error("Feedback not found: {0}")]
    FeedbackNotFound(i64),

    #[error("No donor profile for this account")]
    DonorProfileMissing,

    #[error("No patient profile for this account")]
    PatientProfileMissing,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Unknown blood group: {0}")]
    UnknownBloodGroup(String),

    #[error("Donors must be between 18 and 65 years old (age {age})")]
    DonorAgeOutOfRange { age: i32 },

    #[error("Last donation date cannot be in the future")]
    DonationDateInFuture,

    #[error("Required by date cannot be in the past")]
    RequiredByDateInPast,

    #[error("No phone number on file for OTP delivery")]
    PhoneNotOnFile,

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Email address not found")]
    UnknownEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // =========================================================================
    // Account Policy Rejections
    // =========================================================================
    #[error("Account has been blocked by an administrator")]
    AccountBlocked,

    #[error("Account was permanently deleted {days_since_deletion} days ago")]
    AccountDeleted { days_since_deletion: i64 },

    #[error("Account has been deactivated")]
    AccountInactive,

    #[error("Account is not deleted")]
    AccountNotDeleted,

    // =========================================================================
    // OTP Challenge Errors
    // =========================================================================
    #[error("Too many OTP requests, try again later")]
    OtpRateLimited,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("No active OTP found")]
    OtpNotFound,

    #[error("No pending login verification")]
    NoPendingLogin,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Administrator access required")]
    AdminRequired,

    #[error("Requires the {0} role")]
    RoleRequired(Role),

    #[error("Cannot modify another administrator")]
    CannotModifyAdmin,

    #[error("Cannot delete your own account from the admin panel")]
    CannotDeleteSelf,

    #[error("Role cannot be self-assigned: {0}")]
    RoleNotSelectable(Role),

    #[error("Role switching is not available for {0}")]
    RoleSwitchNotAllowed(Role),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Role already selected")]
    RoleAlreadySelected,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Notification delivery failed: {0}")]
    NotificationFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::DonorNotFound(_) => "UNKNOWN_DONOR",
            Self::PatientNotFound(_) => "UNKNOWN_PATIENT",
            Self::FeedbackNotFound(_) => "UNKNOWN_FEEDBACK",
            Self::DonorProfileMissing => "DONOR_PROFILE_MISSING",
            Self::PatientProfileMissing => "PATIENT_PROFILE_MISSING",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::UnknownBloodGroup(_) => "UNKNOWN_BLOOD_GROUP",
            Self::DonorAgeOutOfRange { .. } => "DONOR_AGE_OUT_OF_RANGE",
            Self::DonationDateInFuture => "DONATION_DATE_IN_FUTURE",
            Self::RequiredByDateInPast => "REQUIRED_BY_DATE_IN_PAST",
            Self::PhoneNotOnFile => "PHONE_NOT_ON_FILE",

            // Authentication
            Self::UnknownEmail => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            // Account policy
            Self::AccountBlocked => "ACCOUNT_BLOCKED",
            Self::AccountDeleted { .. } => "ACCOUNT_DELETED",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::AccountNotDeleted => "ACCOUNT_NOT_DELETED",

            // OTP
            Self::OtpRateLimited => "OTP_RATE_LIMITED",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::OtpMismatch => "OTP_MISMATCH",
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::NoPendingLogin => "NO_PENDING_LOGIN",

            // Authorization
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::RoleRequired(_) => "ROLE_REQUIRED",
            Self::CannotModifyAdmin => "CANNOT_MODIFY_ADMIN",
            Self::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            Self::RoleNotSelectable(_) => "ROLE_NOT_SELECTABLE",
            Self::RoleSwitchNotAllowed(_) => "ROLE_SWITCH_NOT_ALLOWED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::RoleAlreadySelected => "ROLE_ALREADY_SELECTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::NotificationFailed(_) => "NOTIFICATION_FAILED",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::DonorNotFound(_)
                | Self::PatientNotFound(_)
                | Self::FeedbackNotFound(_)
                | Self::DonorProfileMissing
                | Self::PatientProfileMissing
        )
    }

    /// Check if this is a validation error
    ///
    /// Failed OTP challenges count as validation failures of the submitted code.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::WeakPassword(_)
                | Self::UnknownBloodGroup(_)
                | Self::DonorAgeOutOfRange { .. }
                | Self::DonationDateInFuture
                | Self::RequiredByDateInPast
                | Self::PhoneNotOnFile
                | Self::AccountNotDeleted
                | Self::OtpExpired
                | Self::OtpMismatch
                | Self::OtpNotFound
                | Self::NoPendingLogin
        )
    }

    /// Check if this is a failed credential check
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::UnknownEmail | Self::InvalidCredentials)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::AdminRequired
                | Self::RoleRequired(_)
                | Self::CannotModifyAdmin
                | Self::CannotDeleteSelf
                | Self::RoleNotSelectable(_)
                | Self::RoleSwitchNotAllowed(_)
                | Self::AccountBlocked
                | Self::AccountInactive
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::RoleAlreadySelected)
    }

    /// Account rejections only an operator can lift
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            Self::AccountBlocked | Self::AccountDeleted { .. } | Self::AccountInactive
        )
    }

    /// Check if the account is gone for good
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::AccountDeleted { .. })
    }

    /// Check if the caller is being throttled
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::OtpRateLimited)
    }
}
