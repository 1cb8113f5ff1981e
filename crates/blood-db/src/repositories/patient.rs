//! PostgreSQL implementation of PatientRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blood_core::entities::{Patient, PatientProfile};
use blood_core::error::DomainError;
use blood_core::traits::{Page, PatientRepository, PatientSearch, RepoResult};

use crate::models::PatientModel;

use super::error::{blood_group_tags, like_pattern, map_db_error, map_unique_violation};

const PATIENT_COLUMNS: &str = "id, user_id, full_name, blood_group_required, units_required, \
                               hospital_name, location, city, state, pincode, urgency_level, \
                               required_by_date, medical_condition, is_fulfilled, created_at, \
                               updated_at";

/// PostgreSQL implementation of PatientRepository
#[derive(Clone)]
pub struct PgPatientRepository {
    pool: PgPool,
}

impl PgPatientRepository {
    /// Create a new PgPatientRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_patients(rows: Vec<PatientModel>) -> RepoResult<Vec<Patient>> {
    rows.into_iter().map(Patient::try_from).collect()
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Patient>> {
        let result = sqlx::query_as::<_, PatientModel>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Patient::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Patient>> {
        let result = sqlx::query_as::<_, PatientModel>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Patient::try_from).transpose()
    }

    #[instrument(skip(self, profile), fields(blood_group = %profile.blood_group_required))]
    async fn create(&self, user_id: i64, profile: &PatientProfile) -> RepoResult<Patient> {
        let model = sqlx::query_as::<_, PatientModel>(&format!(
            r"
            INSERT INTO patients (user_id, full_name, blood_group_required, units_required,
                                  hospital_name, location, city, state, pincode, urgency_level,
                                  required_by_date, medical_condition)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PATIENT_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&profile.full_name)
        .bind(profile.blood_group_required.as_str())
        .bind(profile.units_required)
        .bind(&profile.hospital_name)
        .bind(&profile.location)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.pincode)
        .bind(profile.urgency_level.as_str())
        .bind(profile.required_by_date)
        .bind(&profile.medical_condition)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError("Patient profile already exists".to_string())
            })
        })?;

        Patient::try_from(model)
    }

    #[instrument(skip(self), fields(patient_id = patient.id))]
    async fn update(&self, patient: &Patient) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE patients
            SET full_name = $2, blood_group_required = $3, units_required = $4,
                hospital_name = $5, location = $6, city = $7, state = $8, pincode = $9,
                urgency_level = $10, required_by_date = $11, medical_condition = $12,
                is_fulfilled = $13, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(patient.id)
        .bind(&patient.full_name)
        .bind(patient.blood_group_required.as_str())
        .bind(patient.units_required)
        .bind(&patient.hospital_name)
        .bind(&patient.location)
        .bind(&patient.city)
        .bind(&patient.state)
        .bind(&patient.pincode)
        .bind(patient.urgency_level.as_str())
        .bind(patient.required_by_date)
        .bind(&patient.medical_condition)
        .bind(patient.is_fulfilled)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PatientNotFound(patient.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &PatientSearch) -> RepoResult<Vec<Patient>> {
        if query.blood_groups.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PatientModel>(&format!(
            r"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE blood_group_required = ANY($1)
              AND ($2::TEXT IS NULL OR city ILIKE $2)
              AND (NOT $3 OR NOT is_fulfilled)
              AND ($4::DATE IS NULL OR required_by_date >= $4)
            ORDER BY id
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(blood_group_tags(&query.blood_groups))
        .bind(like_pattern(query.city.as_deref()))
        .bind(query.unfulfilled_only)
        .bind(query.required_by_on_or_after)
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_patients(rows)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: Page) -> RepoResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, PatientModel>(&format!(
            r"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_patients(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_fulfilled(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients WHERE is_fulfilled")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
