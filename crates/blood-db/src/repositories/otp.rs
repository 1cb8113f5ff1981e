//! PostgreSQL implementation of OtpRepository
//!
//! Issuing runs invalidate+insert in one transaction under an advisory lock
//! keyed by the owner, so concurrent issues for one owner serialize and at
//! most one unused record survives. Consumption is an optimistic
//! `is_used = FALSE` guard: of two concurrent verifiers only one sees an
//! affected row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use blood_core::entities::{NewOtp, Otp};
use blood_core::traits::{OtpRepository, RepoResult};
use blood_core::value_objects::{OtpOwner, OtpPurpose};

use crate::mappers::{owner_filter, OwnerValue};
use crate::models::OtpModel;

use super::error::map_db_error;

const OTP_COLUMNS: &str =
    "id, user_id, email, phone, otp_hash, otp_type, expires_at, is_used, created_at";

/// Bind an owner key with the column type it filters on
macro_rules! bind_owner {
    ($query:expr, $value:expr) => {
        match $value {
            OwnerValue::Id(id) => $query.bind(id),
            OwnerValue::Text(text) => $query.bind(text),
        }
    };
}

/// PostgreSQL implementation of OtpRepository
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    /// Create a new PgOtpRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn count_created_since(&self, owner: &OtpOwner, since: DateTime<Utc>) -> RepoResult<i64> {
        let (column, value) = owner_filter(owner);
        let sql = format!("SELECT COUNT(*) FROM otps WHERE {column} = $1 AND created_at >= $2");

        bind_owner!(sqlx::query_scalar::<_, i64>(&sql), value)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, otp), fields(owner = %owner, purpose = %otp.purpose))]
    async fn replace(&self, owner: &OtpOwner, otp: &NewOtp) -> RepoResult<Otp> {
        let (column, value) = owner_filter(owner);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(owner.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let invalidate =
            format!("UPDATE otps SET is_used = TRUE WHERE {column} = $1 AND is_used = FALSE");
        let superseded = bind_owner!(sqlx::query(&invalidate), value)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let model = sqlx::query_as::<_, OtpModel>(&format!(
            r"
            INSERT INTO otps (user_id, email, phone, otp_hash, otp_type, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OTP_COLUMNS}
            "
        ))
        .bind(otp.user_id)
        .bind(&otp.email)
        .bind(&otp.phone)
        .bind(&otp.code_hash)
        .bind(otp.purpose.as_str())
        .bind(otp.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(superseded, otp_id = model.id, "OTP record replaced");
        Otp::try_from(model)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn latest_unused(
        &self,
        owner: &OtpOwner,
        purpose: OtpPurpose,
    ) -> RepoResult<Option<Otp>> {
        let (column, value) = owner_filter(owner);
        let sql = format!(
            r"
            SELECT {OTP_COLUMNS}
            FROM otps
            WHERE {column} = $1 AND otp_type = $2 AND is_used = FALSE
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "
        );

        let result = bind_owner!(sqlx::query_as::<_, OtpModel>(&sql), value)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Otp::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn mark_used(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE otps SET is_used = TRUE WHERE id = $1 AND is_used = FALSE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
