//! # blood-core
//!
//! Domain layer for the blood donation network: entities, value objects,
//! compatibility and eligibility rules, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    generate_otp_code, normalize_email, Donor, DonorProfile, Feedback, NewFeedback, NewOtp,
    NewUser, Otp, Patient, PatientProfile, PendingLogin, RefreshTokenData, User, OTP_LENGTH,
};
pub use error::DomainError;
pub use rules::RecoveryWindow;
pub use traits::{
    DonorRepository, DonorSearch, FeedbackRepository, OtpRepository, Page, PatientRepository,
    PatientSearch, PendingLoginStore, RefreshTokenStore, RepoResult, UserQuery, UserRepository,
};
pub use value_objects::{BloodGroup, OtpChannel, OtpOwner, OtpPurpose, Role, UrgencyLevel};
