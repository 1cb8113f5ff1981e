//! Admin panel handlers
//!
//! Reads are open to staff (admin and sub-admin); every write needs the
//! admin role. The services enforce both.

use axum::{extract::State, Json};
use blood_service::dto::{
    AdminUpdateUserRequest, DonorResponse, FeedbackListQuery, FeedbackReplyRequest,
    FeedbackResponse, PaginatedResponse, PaginationQuery, PatientResponse, StatisticsResponse,
    UserListQuery, UserResponse,
};
use blood_service::services::AdminService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /admin/stats
pub async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StatisticsResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.statistics(auth.user_id).await?))
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<UserListQuery>,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_users(auth.user_id, query).await?))
}

/// GET /admin/donors
pub async fn list_donors(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> ApiResult<Json<PaginatedResponse<DonorResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_donors(auth.user_id, query).await?))
}

/// GET /admin/patients
pub async fn list_patients(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> ApiResult<Json<PaginatedResponse<PatientResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_patients(auth.user_id, query).await?))
}

/// GET /admin/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<FeedbackListQuery>,
) -> ApiResult<Json<PaginatedResponse<FeedbackResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_feedback(auth.user_id, query).await?))
}

/// POST /admin/users/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.toggle_active(auth.user_id, user_id).await?))
}

/// POST /admin/users/{id}/block
pub async fn block_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.block_user(auth.user_id, user_id).await?))
}

/// POST /admin/users/{id}/unblock
pub async fn unblock_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.unblock_user(auth.user_id, user_id).await?))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<NoContent> {
    let service = AdminService::new(state.service_context());
    service.delete_user(auth.user_id, user_id).await?;
    Ok(NoContent)
}

/// PATCH /admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
    ValidatedJson(request): ValidatedJson<AdminUpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.update_user(auth.user_id, user_id, request).await?))
}

/// POST /admin/patients/{id}/fulfill
pub async fn fulfill_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(patient_id): IdPath,
) -> ApiResult<Json<PatientResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.fulfill_patient(auth.user_id, patient_id).await?))
}

/// POST /admin/feedback/{id}/respond
pub async fn respond_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(feedback_id): IdPath,
    ValidatedJson(request): ValidatedJson<FeedbackReplyRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(
        service
            .respond_feedback(auth.user_id, feedback_id, request)
            .await?,
    ))
}

/// POST /admin/feedback/{id}/toggle-status
pub async fn toggle_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(feedback_id): IdPath,
) -> ApiResult<Json<FeedbackResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.toggle_feedback(auth.user_id, feedback_id).await?))
}
