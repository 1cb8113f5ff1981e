//! User entity <-> model mapper

use blood_core::entities::User;
use blood_core::value_objects::Role;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            email: model.email,
            phone: model.phone,
            role: Role::from_db(model.role.as_deref()),
            is_verified: model.is_verified,
            is_active: model.is_active,
            is_blocked: model.is_blocked,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            last_login: model.last_login,
        }
    }
}

/// Values written by a full-row user update
pub struct UserUpdate<'a> {
    pub id: i64,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub role: Option<&'static str>,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_blocked: bool,
}

impl<'a> UserUpdate<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            id: user.id,
            email: &user.email,
            phone: user.phone.as_deref(),
            role: user.role.as_db(),
            is_verified: user.is_verified,
            is_active: user.is_active,
            is_blocked: user.is_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_null_role_maps_to_unset() {
        let model = UserModel {
            id: 3,
            email: "new@example.com".to_string(),
            phone: None,
            role: None,
            is_verified: false,
            is_active: true,
            is_blocked: false,
            deleted_at: None,
            created_at: Utc::now(),
            last_login: None,
        };
        let user = User::from(model);
        assert_eq!(user.role, Role::Unset);
        assert!(UserUpdate::new(&user).role.is_none());
    }
}
