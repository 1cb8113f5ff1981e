//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, donors, health, patients, public};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(donor_routes())
        .merge(patient_routes())
        .merge(public_routes())
        .merge(admin_routes())
}

/// Authentication and account routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/login/verify-otp", post(auth::verify_login_otp))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/recover", post(auth::recover_account))
        .route("/auth/select-role", post(auth::select_role))
        .route("/auth/switch-role", post(auth::switch_role))
        .route("/auth/account", delete(auth::delete_account))
        .route("/auth/me", get(auth::current_user))
}

fn donor_routes() -> Router<AppState> {
    Router::new()
        .route("/donors/me", put(donors::save_profile).get(donors::get_profile))
        .route("/donors/me/availability", post(donors::set_availability))
        .route("/donors/me/donations", post(donors::record_donation))
        .route("/donors/me/matches", get(donors::matches))
}

fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/patients/me", put(patients::save_profile).get(patients::get_profile))
        .route("/patients/me/matches", get(patients::matches))
        .route("/patients/me/search", get(patients::search_donors))
        .route("/patients/me/donors/:id", get(patients::donor_detail))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(public::submit_feedback))
        .route("/compatibility", get(public::compatibility_chart))
}

/// Admin panel routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        // Staff reads
        .route("/admin/stats", get(admin::statistics))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/donors", get(admin::list_donors))
        .route("/admin/patients", get(admin::list_patients))
        .route("/admin/feedback", get(admin::list_feedback))
        // Admin writes
        .route(
            "/admin/users/:id",
            delete(admin::delete_user).patch(admin::update_user),
        )
        .route("/admin/users/:id/toggle-active", post(admin::toggle_active))
        .route("/admin/users/:id/block", post(admin::block_user))
        .route("/admin/users/:id/unblock", post(admin::unblock_user))
        .route("/admin/patients/:id/fulfill", post(admin::fulfill_patient))
        .route("/admin/feedback/:id/respond", post(admin::respond_feedback))
        .route("/admin/feedback/:id/toggle-status", post(admin::toggle_feedback))
}
