//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the length of a
//! request and orchestrates repositories, stores, and the notifier.

pub(crate) mod access;
pub mod admin;
pub mod auth;
pub mod clock;
pub mod context;
pub mod donor;
pub mod error;
pub mod feedback;
pub mod matching;
pub mod notifier;
pub mod otp;
pub mod patient;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use admin::AdminService;
pub use auth::AuthService;
pub use clock::{Clock, SystemClock};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use donor::DonorService;
pub use error::{ServiceError, ServiceResult};
pub use feedback::FeedbackService;
pub use matching::MatchService;
pub use notifier::{DeliveryChannel, LogNotifier, Notification, Notifier};
pub use otp::{IssuedOtp, OtpService, OtpVerification};
pub use patient::PatientService;
