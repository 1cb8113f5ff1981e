//! PostgreSQL implementation of FeedbackRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blood_core::entities::{Feedback, NewFeedback};
use blood_core::error::DomainError;
use blood_core::traits::{FeedbackRepository, Page, RepoResult};

use crate::models::FeedbackModel;

use super::error::map_db_error;

const FEEDBACK_COLUMNS: &str = "id, name, email, subject, message, rating, is_resolved, \
                                admin_response, created_at, resolved_at";

/// PostgreSQL implementation of FeedbackRepository
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    /// Create a new PgFeedbackRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    #[instrument(skip(self, feedback), fields(email = %feedback.email))]
    async fn create(&self, feedback: &NewFeedback) -> RepoResult<Feedback> {
        let model = sqlx::query_as::<_, FeedbackModel>(&format!(
            r"
            INSERT INTO feedback (name, email, subject, message, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FEEDBACK_COLUMNS}
            "
        ))
        .bind(&feedback.name)
        .bind(&feedback.email)
        .bind(&feedback.subject)
        .bind(&feedback.message)
        .bind(feedback.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Feedback::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Feedback>> {
        let result = sqlx::query_as::<_, FeedbackModel>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Feedback::from))
    }

    #[instrument(skip(self), fields(feedback_id = feedback.id))]
    async fn update(&self, feedback: &Feedback) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE feedback
            SET is_resolved = $2, admin_response = $3, resolved_at = $4
            WHERE id = $1
            ",
        )
        .bind(feedback.id)
        .bind(feedback.is_resolved)
        .bind(&feedback.admin_response)
        .bind(feedback.resolved_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FeedbackNotFound(feedback.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, resolved: Option<bool>, page: Page) -> RepoResult<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackModel>(&format!(
            r"
            SELECT {FEEDBACK_COLUMNS}
            FROM feedback
            WHERE ($1::BOOLEAN IS NULL OR is_resolved = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(resolved)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_unresolved(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback WHERE NOT is_resolved")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
