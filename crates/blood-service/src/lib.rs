//! # blood-service
//!
//! Application layer: authentication with OTP challenges, donor and patient
//! profiles, compatibility matching, and the admin panel, plus the DTOs the
//! API speaks.

pub mod dto;
pub mod services;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
