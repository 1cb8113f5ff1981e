//! Service layer error types

use blood_common::{domain_status, AppError};
use blood_core::DomainError;
use std::fmt;

/// Error returned by every service operation
///
/// Business rule violations arrive as [`DomainError`] and keep their own
/// codes all the way to the HTTP body. Token and hashing failures come from
/// `blood-common` as [`AppError`].
#[derive(Debug)]
pub enum ServiceError {
    Domain(DomainError),
    App(AppError),
    /// A [`ServiceContext`](super::ServiceContext) was built without a store
    MissingDependency(&'static str),
    /// Invariant the service itself should have upheld
    Internal(&'static str),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::MissingDependency(name) => write!(f, "Service context is missing {name}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            Self::MissingDependency(_) | Self::Internal(_) => None,
        }
    }
}

impl ServiceError {
    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::MissingDependency(_) | Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::MissingDependency(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::MissingDependency(name) => {
                AppError::Config(format!("service context is missing {name}"))
            }
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
