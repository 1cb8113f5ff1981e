//! Account gates shared by every authenticated operation

use blood_core::entities::User;
use blood_core::rules::RecoveryWindow;
use blood_core::{DomainError, Role};
use chrono::{DateTime, Utc};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reject accounts that may not act, in the same order login checks them
pub(crate) fn ensure_usable(user: &User, now: DateTime<Utc>) -> Result<(), DomainError> {
    if user.is_blocked {
        return Err(DomainError::AccountBlocked);
    }
    match user.recovery_window(now) {
        RecoveryWindow::NotDeleted => {}
        RecoveryWindow::Recoverable {
            days_since_deletion,
        }
        | RecoveryWindow::Expired {
            days_since_deletion,
        } => {
            return Err(DomainError::AccountDeleted {
                days_since_deletion,
            })
        }
    }
    if !user.is_active {
        return Err(DomainError::AccountInactive);
    }
    Ok(())
}

/// Load the acting user and apply [`ensure_usable`]
pub(crate) async fn load_actor(ctx: &ServiceContext, user_id: i64) -> ServiceResult<User> {
    let user = ctx
        .user_repo()
        .find_by_id(user_id)
        .await?
        .ok_or(DomainError::UserNotFound(user_id))?;
    ensure_usable(&user, ctx.now())?;
    Ok(user)
}

pub(crate) fn require_role(user: &User, role: Role) -> Result<(), DomainError> {
    if user.role == role {
        Ok(())
    } else {
        Err(DomainError::RoleRequired(role))
    }
}

/// Admins and sub-admins may read moderation listings
pub(crate) fn require_staff(user: &User) -> Result<(), DomainError> {
    if user.role.is_privileged() {
        Ok(())
    } else {
        Err(DomainError::AdminRequired)
    }
}

pub(crate) fn require_admin(user: &User) -> Result<(), DomainError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(DomainError::AdminRequired)
    }
}

/// Partially hide an email address or phone number for display
pub(crate) fn mask_destination(destination: &str) -> String {
    if let Some((local, domain)) = destination.split_once('@') {
        let first: String = local.chars().take(1).collect();
        return format!("{first}***@{domain}");
    }
    let digits: Vec<char> = destination.chars().collect();
    let keep = digits.len().min(4);
    let hidden = digits.len() - keep;
    let tail: String = digits[hidden..].iter().collect();
    format!("{}{tail}", "*".repeat(hidden))
}
