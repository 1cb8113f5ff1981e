//! Patient handlers
//!
//! The blood request itself plus donor discovery for its owner.

use axum::{extract::State, Json};
use blood_service::dto::{
    DonorDetailResponse, DonorResponse, DonorSearchQuery, PaginatedResponse,
    PatientProfileRequest, PatientProfileSaved, PatientResponse,
};
use blood_service::services::PatientService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create or update the caller's blood request
///
/// PUT /patients/me
pub async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<PatientProfileRequest>,
) -> ApiResult<Json<PatientProfileSaved>> {
    let service = PatientService::new(state.service_context());
    let response = service.save_profile(auth.user_id, request).await?;
    Ok(Json(response))
}

/// GET /patients/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PatientResponse>> {
    let service = PatientService::new(state.service_context());
    let response = service.profile(auth.user_id).await?;
    Ok(Json(response))
}

/// GET /patients/me/matches
pub async fn matches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<DonorResponse>>> {
    let service = PatientService::new(state.service_context());
    let response = service.matches(auth.user_id).await?;
    Ok(Json(response))
}

/// Search compatible donors, optionally narrowed by group and place
///
/// GET /patients/me/search
pub async fn search_donors(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DonorSearchQuery>,
) -> ApiResult<Json<PaginatedResponse<DonorResponse>>> {
    let service = PatientService::new(state.service_context());
    let response = service.search_donors(auth.user_id, query).await?;
    Ok(Json(response))
}

/// GET /patients/me/donors/{id}
pub async fn donor_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(donor_id): IdPath,
) -> ApiResult<Json<DonorDetailResponse>> {
    let service = PatientService::new(state.service_context());
    let response = service.donor_detail(auth.user_id, donor_id).await?;
    Ok(Json(response))
}
