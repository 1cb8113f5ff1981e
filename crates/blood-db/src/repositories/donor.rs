//! PostgreSQL implementation of DonorRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blood_core::entities::{Donor, DonorProfile};
use blood_core::error::DomainError;
use blood_core::traits::{DonorRepository, DonorSearch, Page, RepoResult};
use blood_core::value_objects::BloodGroup;

use crate::models::{BloodGroupCountModel, DonorModel};

use super::error::{blood_group_tags, like_pattern, map_db_error, map_unique_violation};

const DONOR_COLUMNS: &str = "id, user_id, full_name, blood_group, date_of_birth, gender, address, \
                             city, state, pincode, last_donation_date, is_available, \
                             medical_history, created_at, updated_at";

/// PostgreSQL implementation of DonorRepository
#[derive(Clone)]
pub struct PgDonorRepository {
    pool: PgPool,
}

impl PgDonorRepository {
    /// Create a new PgDonorRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_donors(rows: Vec<DonorModel>) -> RepoResult<Vec<Donor>> {
    rows.into_iter().map(Donor::try_from).collect()
}

#[async_trait]
impl DonorRepository for PgDonorRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Donor>> {
        let result = sqlx::query_as::<_, DonorModel>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Donor::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Donor>> {
        let result = sqlx::query_as::<_, DonorModel>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Donor::try_from).transpose()
    }

    #[instrument(skip(self, profile), fields(blood_group = %profile.blood_group))]
    async fn create(&self, user_id: i64, profile: &DonorProfile) -> RepoResult<Donor> {
        let model = sqlx::query_as::<_, DonorModel>(&format!(
            r"
            INSERT INTO donors (user_id, full_name, blood_group, date_of_birth, gender, address,
                                city, state, pincode, last_donation_date, is_available,
                                medical_history)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {DONOR_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&profile.full_name)
        .bind(profile.blood_group.as_str())
        .bind(profile.date_of_birth)
        .bind(&profile.gender)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.pincode)
        .bind(profile.last_donation_date)
        .bind(profile.is_available)
        .bind(&profile.medical_history)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError("Donor profile already exists".to_string())
            })
        })?;

        Donor::try_from(model)
    }

    #[instrument(skip(self), fields(donor_id = donor.id))]
    async fn update(&self, donor: &Donor) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE donors
            SET full_name = $2, blood_group = $3, date_of_birth = $4, gender = $5,
                address = $6, city = $7, state = $8, pincode = $9, last_donation_date = $10,
                is_available = $11, medical_history = $12, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(donor.id)
        .bind(&donor.full_name)
        .bind(donor.blood_group.as_str())
        .bind(donor.date_of_birth)
        .bind(&donor.gender)
        .bind(&donor.address)
        .bind(&donor.city)
        .bind(&donor.state)
        .bind(&donor.pincode)
        .bind(donor.last_donation_date)
        .bind(donor.is_available)
        .bind(&donor.medical_history)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::DonorNotFound(donor.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &DonorSearch) -> RepoResult<Vec<Donor>> {
        if query.blood_groups.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DonorModel>(&format!(
            r"
            SELECT {DONOR_COLUMNS}
            FROM donors
            WHERE blood_group = ANY($1)
              AND ($2::TEXT IS NULL OR city ILIKE $2)
              AND ($3::TEXT IS NULL OR state ILIKE $3)
              AND (NOT $4 OR is_available)
              AND ($5::DATE IS NULL OR last_donation_date IS NULL OR last_donation_date <= $5)
            ORDER BY id
            LIMIT $6 OFFSET $7
            "
        ))
        .bind(blood_group_tags(&query.blood_groups))
        .bind(like_pattern(query.city.as_deref()))
        .bind(like_pattern(query.state.as_deref()))
        .bind(query.available_only)
        .bind(query.last_donation_on_or_before)
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_donors(rows)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: Page) -> RepoResult<Vec<Donor>> {
        let rows = sqlx::query_as::<_, DonorModel>(&format!(
            r"
            SELECT {DONOR_COLUMNS}
            FROM donors
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_donors(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donors")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_available(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donors WHERE is_available")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_by_blood_group(&self) -> RepoResult<Vec<(BloodGroup, i64)>> {
        let rows = sqlx::query_as::<_, BloodGroupCountModel>(
            r"
            SELECT blood_group, COUNT(*) AS total
            FROM donors
            GROUP BY blood_group
            ORDER BY blood_group
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(BloodGroupCountModel::into_pair).collect()
    }
}
