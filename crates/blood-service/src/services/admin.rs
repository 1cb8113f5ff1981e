//! Admin service
//!
//! Moderation for administrators. Sub-admins may read every listing and the
//! statistics but cannot change anything.

use blood_core::entities::{normalize_email, User};
use blood_core::traits::UserQuery;
use blood_core::{DomainError, Role};
use tracing::{info, instrument};

use crate::dto::{
    AdminUpdateUserRequest, DonorResponse, FeedbackListQuery, FeedbackReplyRequest,
    FeedbackResponse, PaginatedResponse, PaginationQuery, PatientResponse, StatisticsResponse,
    UserListQuery, UserResponse,
};

use super::access::{load_actor, require_admin, require_staff};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::matching::MatchService;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Read-only (admin and sub-admin)
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn statistics(&self, actor_id: i64) -> ServiceResult<StatisticsResponse> {
        self.staff(actor_id).await?;
        MatchService::new(self.ctx).statistics().await
    }

    #[instrument(skip(self, query))]
    pub async fn list_users(
        &self,
        actor_id: i64,
        query: UserListQuery,
    ) -> ServiceResult<PaginatedResponse<UserResponse>> {
        self.staff(actor_id).await?;
        let page = query.pagination.page();
        let users = self
            .ctx
            .user_repo()
            .list(&UserQuery {
                role: query.role,
                search: query.search.filter(|s| !s.trim().is_empty()),
                page,
            })
            .await?;

        Ok(PaginatedResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            query.pagination.page.unwrap_or(1),
            page.limit,
        ))
    }

    #[instrument(skip(self, query))]
    pub async fn list_donors(
        &self,
        actor_id: i64,
        query: PaginationQuery,
    ) -> ServiceResult<PaginatedResponse<DonorResponse>> {
        self.staff(actor_id).await?;
        let page = query.page();
        let donors = self.ctx.donor_repo().list(page).await?;

        let now = self.ctx.now();
        Ok(PaginatedResponse::new(
            donors.iter().map(|d| DonorResponse::new(d, now)).collect(),
            query.page.unwrap_or(1),
            page.limit,
        ))
    }

    #[instrument(skip(self, query))]
    pub async fn list_patients(
        &self,
        actor_id: i64,
        query: PaginationQuery,
    ) -> ServiceResult<PaginatedResponse<PatientResponse>> {
        self.staff(actor_id).await?;
        let page = query.page();
        let patients = self.ctx.patient_repo().list(page).await?;

        let now = self.ctx.now();
        Ok(PaginatedResponse::new(
            patients.iter().map(|p| PatientResponse::new(p, now)).collect(),
            query.page.unwrap_or(1),
            page.limit,
        ))
    }

    #[instrument(skip(self, query))]
    pub async fn list_feedback(
        &self,
        actor_id: i64,
        query: FeedbackListQuery,
    ) -> ServiceResult<PaginatedResponse<FeedbackResponse>> {
        self.staff(actor_id).await?;
        let page = query.pagination.page();
        let feedback = self.ctx.feedback_repo().list(query.resolved, page).await?;

        Ok(PaginatedResponse::new(
            feedback.into_iter().map(FeedbackResponse::from).collect(),
            query.pagination.page.unwrap_or(1),
            page.limit,
        ))
    }

    // ========================================================================
    // Moderation (admin only)
    // ========================================================================

    /// Flip a user's active flag
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, actor_id: i64, user_id: i64) -> ServiceResult<UserResponse> {
        self.admin(actor_id).await?;
        let mut user = self.modifiable_user(user_id).await?;

        user.is_active = !user.is_active;
        self.ctx.user_repo().update(&user).await?;
        if !user.is_active {
            self.ctx.refresh_tokens().revoke_all_for_user(user_id).await?;
        }

        info!(admin_id = actor_id, user_id, is_active = user.is_active, "User active flag toggled");
        Ok(UserResponse::from(user))
    }

    #[instrument(skip(self))]
    pub async fn block_user(&self, actor_id: i64, user_id: i64) -> ServiceResult<UserResponse> {
        self.admin(actor_id).await?;
        let mut user = self.modifiable_user(user_id).await?;

        user.block();
        self.ctx.user_repo().update(&user).await?;
        self.ctx.refresh_tokens().revoke_all_for_user(user_id).await?;

        info!(admin_id = actor_id, user_id, "User blocked");
        Ok(UserResponse::from(user))
    }

    #[instrument(skip(self))]
    pub async fn unblock_user(&self, actor_id: i64, user_id: i64) -> ServiceResult<UserResponse> {
        self.admin(actor_id).await?;
        let mut user = self.modifiable_user(user_id).await?;

        user.unblock();
        self.ctx.user_repo().update(&user).await?;

        info!(admin_id = actor_id, user_id, "User unblocked");
        Ok(UserResponse::from(user))
    }

    /// Soft-delete another account
    #[instrument(skip(self))]
    pub async fn delete_user(&self, actor_id: i64, user_id: i64) -> ServiceResult<()> {
        self.admin(actor_id).await?;
        if actor_id == user_id {
            return Err(DomainError::CannotDeleteSelf.into());
        }
        let mut user = self.modifiable_user(user_id).await?;
        let now = self.ctx.now();

        user.soft_delete(now);
        self.ctx.user_repo().update(&user).await?;
        if let Some(mut donor) = self.ctx.donor_repo().find_by_user(user_id).await? {
            donor.is_available = false;
            donor.updated_at = now;
            self.ctx.donor_repo().update(&donor).await?;
        }
        self.ctx.refresh_tokens().revoke_all_for_user(user_id).await?;

        info!(admin_id = actor_id, user_id, "User soft-deleted by admin");
        Ok(())
    }

    /// Edit a user's email, phone, or role
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        actor_id: i64,
        user_id: i64,
        request: AdminUpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        self.admin(actor_id).await?;
        let mut user = self.modifiable_user(user_id).await?;

        if let Some(email) = request.email {
            let email = normalize_email(&email);
            if email != user.email {
                if self.ctx.user_repo().email_exists(&email).await? {
                    return Err(DomainError::EmailAlreadyExists.into());
                }
                user.email = email;
            }
        }
        if let Some(phone) = request.phone {
            let phone = phone.trim().to_string();
            user.phone = (!phone.is_empty()).then_some(phone);
        }
        if let Some(role) = request.role {
            if role == Role::Admin {
                return Err(DomainError::RoleNotSelectable(role).into());
            }
            user.role = role;
        }

        self.ctx.user_repo().update(&user).await?;

        info!(admin_id = actor_id, user_id, "User updated by admin");
        Ok(UserResponse::from(user))
    }

    #[instrument(skip(self))]
    pub async fn fulfill_patient(
        &self,
        actor_id: i64,
        patient_id: i64,
    ) -> ServiceResult<PatientResponse> {
        self.admin(actor_id).await?;
        let mut patient = self
            .ctx
            .patient_repo()
            .find_by_id(patient_id)
            .await?
            .ok_or(DomainError::PatientNotFound(patient_id))?;

        let now = self.ctx.now();
        patient.is_fulfilled = true;
        patient.updated_at = now;
        self.ctx.patient_repo().update(&patient).await?;

        info!(admin_id = actor_id, patient_id, "Patient request fulfilled");
        Ok(PatientResponse::new(&patient, now))
    }

    /// Reply to feedback, which also resolves it
    #[instrument(skip(self, request))]
    pub async fn respond_feedback(
        &self,
        actor_id: i64,
        feedback_id: i64,
        request: FeedbackReplyRequest,
    ) -> ServiceResult<FeedbackResponse> {
        self.admin(actor_id).await?;
        let mut feedback = self
            .ctx
            .feedback_repo()
            .find_by_id(feedback_id)
            .await?
            .ok_or(DomainError::FeedbackNotFound(feedback_id))?;

        feedback.respond(request.response.trim().to_string(), self.ctx.now());
        self.ctx.feedback_repo().update(&feedback).await?;

        info!(admin_id = actor_id, feedback_id, "Feedback answered");
        Ok(FeedbackResponse::from(feedback))
    }

    #[instrument(skip(self))]
    pub async fn toggle_feedback(
        &self,
        actor_id: i64,
        feedback_id: i64,
    ) -> ServiceResult<FeedbackResponse> {
        self.admin(actor_id).await?;
        let mut feedback = self
            .ctx
            .feedback_repo()
            .find_by_id(feedback_id)
            .await?
            .ok_or(DomainError::FeedbackNotFound(feedback_id))?;

        feedback.toggle_resolved(self.ctx.now());
        self.ctx.feedback_repo().update(&feedback).await?;

        info!(admin_id = actor_id, feedback_id, is_resolved = feedback.is_resolved, "Feedback status toggled");
        Ok(FeedbackResponse::from(feedback))
    }

    // ------------------------------------------------------------------------

    async fn staff(&self, actor_id: i64) -> ServiceResult<User> {
        let actor = load_actor(self.ctx, actor_id).await?;
        require_staff(&actor)?;
        Ok(actor)
    }

    async fn admin(&self, actor_id: i64) -> ServiceResult<User> {
        let actor = load_actor(self.ctx, actor_id).await?;
        require_admin(&actor)?;
        Ok(actor)
    }

    /// Target account of a moderation action; administrators are off limits
    async fn modifiable_user(&self, user_id: i64) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        if user.role == Role::Admin {
            return Err(DomainError::CannotModifyAdmin.into());
        }
        Ok(user)
    }
}
