//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in blood-core.
//! Each repository handles database operations for a specific domain entity.

mod donor;
mod error;
mod feedback;
mod otp;
mod patient;
mod user;

pub(crate) use error::corrupt_column;

pub use donor::PgDonorRepository;
pub use feedback::PgFeedbackRepository;
pub use otp::PgOtpRepository;
pub use patient::PgPatientRepository;
pub use user::PgUserRepository;
