//! Donor handlers

use axum::{extract::State, Json};
use blood_service::dto::{
    AvailabilityRequest, DonorProfileRequest, DonorProfileSaved, DonorResponse, PatientResponse,
    RecordDonationRequest,
};
use blood_service::services::DonorService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create or update the caller's donor profile
///
/// PUT /donors/me
pub async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<DonorProfileRequest>,
) -> ApiResult<Json<DonorProfileSaved>> {
    let service = DonorService::new(state.service_context());
    let response = service.save_profile(auth.user_id, request).await?;
    Ok(Json(response))
}

/// GET /donors/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DonorResponse>> {
    let service = DonorService::new(state.service_context());
    let response = service.profile(auth.user_id).await?;
    Ok(Json(response))
}

/// Set availability; an empty body toggles it
///
/// POST /donors/me/availability
pub async fn set_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<AvailabilityRequest>>,
) -> ApiResult<Json<DonorResponse>> {
    let service = DonorService::new(state.service_context());
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let response = service.set_availability(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Record a donation (today unless a date is given)
///
/// POST /donors/me/donations
pub async fn record_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<RecordDonationRequest>>,
) -> ApiResult<Json<DonorResponse>> {
    let service = DonorService::new(state.service_context());
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let response = service.record_donation(auth.user_id, request).await?;
    Ok(Json(response))
}

/// GET /donors/me/matches
pub async fn matches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PatientResponse>>> {
    let service = DonorService::new(state.service_context());
    let response = service.matches(auth.user_id).await?;
    Ok(Json(response))
}
