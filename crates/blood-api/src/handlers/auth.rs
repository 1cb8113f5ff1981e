//! Authentication handlers
//!
//! Registration, the two-step login, token refresh, account recovery, and
//! role selection.

use axum::{extract::State, Json};
use blood_service::dto::{
    AuthResponse, CurrentUserResponse, LoginOutcome, LoginRequest, LogoutRequest,
    RecoverAccountRequest, RefreshTokenRequest, RegisterRequest, RoleChangeResponse,
    SelectRoleRequest, UserResponse, VerifyLoginOtpRequest,
};
use blood_service::services::AuthService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// The body's `status` tells the client whether it is signed in, owes an
/// OTP, or may recover a deleted account.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginOutcome>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Complete a privileged login with its OTP
///
/// POST /auth/login/verify-otp
pub async fn verify_login_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyLoginOtpRequest>,
) -> ApiResult<Json<LoginOutcome>> {
    let service = AuthService::new(state.service_context());
    let response = service.verify_login_otp(request).await?;
    Ok(Json(response))
}

/// Refresh access token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Json(response))
}

/// Logout; without a token in the body every session is revoked
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    let request = body.map(|Json(b)| b).unwrap_or_default();
    service.logout(auth.user_id, request).await?;
    Ok(NoContent)
}

/// POST /auth/recover
pub async fn recover_account(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecoverAccountRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.recover_account(request).await?;
    Ok(Json(response))
}

/// POST /auth/select-role
pub async fn select_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<SelectRoleRequest>,
) -> ApiResult<Json<RoleChangeResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.select_role(auth.user_id, request).await?;
    Ok(Json(response))
}

/// POST /auth/switch-role
pub async fn switch_role(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<RoleChangeResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.switch_role(auth.user_id).await?;
    Ok(Json(response))
}

/// Soft-delete the caller's account
///
/// DELETE /auth/account
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    service.delete_account(auth.user_id).await?;
    Ok(NoContent)
}

/// GET /auth/me
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_user(auth.user_id).await?;
    Ok(Json(response))
}
