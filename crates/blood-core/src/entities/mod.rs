//! Domain entities - core business objects

mod donor;
mod feedback;
mod otp;
mod patient;
mod session;
mod user;

pub use donor::{Donor, DonorProfile};
pub use feedback::{Feedback, NewFeedback};
pub use otp::{generate_otp_code, NewOtp, Otp, OTP_LENGTH};
pub use patient::{Patient, PatientProfile};
pub use session::{PendingLogin, RefreshTokenData};
pub use user::{normalize_email, NewUser, User};
