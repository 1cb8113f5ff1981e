//! Integration test utilities for the blood donation API
//!
//! Spawns the real server against Postgres and Redis and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
