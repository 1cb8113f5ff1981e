//! Value objects - immutable types that represent domain concepts

mod blood_group;
mod otp;
mod role;
mod urgency;

pub use blood_group::{BloodGroup, BloodGroupParseError};
pub use otp::{OtpChannel, OtpOwner, OtpPurpose};
pub use role::Role;
pub use urgency::UrgencyLevel;
