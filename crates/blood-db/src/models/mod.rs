//! Database models
//!
//! Row structs mirroring the tables one-to-one. Enumerated columns stay as
//! strings here and are parsed by the mappers.

mod donor;
mod feedback;
mod otp;
mod patient;
mod user;

pub use donor::{BloodGroupCountModel, DonorModel};
pub use feedback::FeedbackModel;
pub use otp::OtpModel;
pub use patient::PatientModel;
pub use user::UserModel;
