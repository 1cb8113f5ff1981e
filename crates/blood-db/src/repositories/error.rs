//! Error handling utilities for repositories

use blood_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// A stored column held a value the domain cannot represent
pub fn corrupt_column(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("unexpected value {value:?} in column {column}"))
}

/// Bind parameter for a `= ANY($n)` blood group filter
pub fn blood_group_tags(groups: &[blood_core::BloodGroup]) -> Vec<&'static str> {
    groups.iter().map(|g| g.as_str()).collect()
}

/// `%term%` pattern for case-insensitive substring matching
///
/// `None` or blank input yields `None` so the filter is skipped.
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}
