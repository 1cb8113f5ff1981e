//! # blood-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `blood-core`. It handles:
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blood_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use blood_db::repositories::PgDonorRepository;
//!
//! async fn example(settings: &blood_common::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from(settings)).await?;
//!     run_migrations(&pool).await?;
//!     let donors = PgDonorRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgDonorRepository, PgFeedbackRepository, PgOtpRepository, PgPatientRepository,
    PgUserRepository,
};
