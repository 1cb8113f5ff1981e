//! Unauthenticated endpoints: the contact form and the compatibility chart

use axum::{extract::State, Json};
use blood_service::dto::{CompatibilityChart, FeedbackRequest, FeedbackResponse};
use blood_service::services::FeedbackService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FeedbackRequest>,
) -> ApiResult<Created<Json<FeedbackResponse>>> {
    let service = FeedbackService::new(state.service_context());
    let response = service.submit(request).await?;
    Ok(Created(Json(response)))
}

/// GET /compatibility
pub async fn compatibility_chart() -> Json<CompatibilityChart> {
    Json(CompatibilityChart::build())
}
