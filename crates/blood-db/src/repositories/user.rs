//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blood_core::entities::{NewUser, User};
use blood_core::error::DomainError;
use blood_core::traits::{RepoResult, UserQuery, UserRepository};
use blood_core::value_objects::Role;

use crate::mappers::UserUpdate;
use crate::models::UserModel;

use super::error::{like_pattern, map_db_error, map_unique_violation};

const USER_COLUMNS: &str = "id, email, phone, role, is_verified, is_active, is_blocked, \
                            deleted_at, created_at, last_login";

/// PostgreSQL implementation of UserRepository
///
/// Soft-deleted rows stay visible: login needs them to offer recovery.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Role filter value; the empty string selects accounts without a role
fn role_filter(role: Option<Role>) -> Option<&'static str> {
    role.map(|r| r.as_db().unwrap_or(""))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash), fields(email = %user.email))]
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let model = sqlx::query_as::<_, UserModel>(&format!(
            r"
            INSERT INTO users (email, password_hash, phone, role, is_verified)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.phone)
        .bind(user.role.as_db())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(User::from(model))
    }

    #[instrument(skip(self), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let values = UserUpdate::new(user);
        let result = sqlx::query(
            r"
            UPDATE users
            SET email = $2, phone = $3, role = $4, is_verified = $5, is_active = $6,
                is_blocked = $7, deleted_at = $8, last_login = $9
            WHERE id = $1
            ",
        )
        .bind(values.id)
        .bind(values.email)
        .bind(values.phone)
        .bind(values.role)
        .bind(values.is_verified)
        .bind(values.is_active)
        .bind(values.is_blocked)
        .bind(user.deleted_at)
        .bind(user.last_login)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &UserQuery) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::TEXT IS NULL OR COALESCE(role, '') = $1)
              AND ($2::TEXT IS NULL OR email ILIKE $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(role_filter(query.role))
        .bind(like_pattern(query.search.as_deref()))
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
