//! Entity to model mappers
//!
//! This module provides conversions between domain entities (blood-core) and database models.
//! - `From<Model> for Entity` / `TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Update` structs: Prepare entity data for database operations

mod donor;
mod feedback;
mod otp;
mod patient;
mod user;

pub use otp::{owner_filter, OwnerValue};
pub use user::UserUpdate;
