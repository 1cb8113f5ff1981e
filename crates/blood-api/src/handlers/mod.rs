//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod donors;
pub mod health;
pub mod patients;
pub mod public;
