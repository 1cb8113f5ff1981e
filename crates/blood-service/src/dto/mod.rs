//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AdminUpdateUserRequest, AvailabilityRequest, DonorProfileRequest, DonorSearchQuery,
    FeedbackListQuery, FeedbackReplyRequest, FeedbackRequest, LoginRequest, LogoutRequest,
    PaginationQuery, PatientProfileRequest, RecordDonationRequest, RecoverAccountRequest,
    RefreshTokenRequest, RegisterRequest, SelectRoleRequest, UserListQuery,
    VerifyLoginOtpRequest,
};

// Re-export commonly used response types
pub use responses::{
    ApiResponse, AuthResponse, CompatibilityChart, CurrentUserResponse, Destination,
    DonorDetailResponse, DonorProfileSaved, DonorResponse, FeedbackResponse, HealthChecks,
    HealthResponse, LoginOutcome, MessageResponse, PaginatedResponse, PaginationMeta,
    PatientProfileSaved, PatientResponse, ReadinessResponse, RoleChangeResponse,
    StatisticsResponse, UserResponse,
};
