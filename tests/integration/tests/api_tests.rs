//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["redis"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(user.email, request.email);
    assert_eq!(user.role.as_deref(), Some("unset"));
    assert!(user.is_active);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_login_without_role_goes_to_role_selection() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register = RegisterRequest::unique();
    server.post("/auth/register", &register).await.unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&register))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["destination"]["kind"], "select_role");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_unknown_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        email: format!("nobody_{}@example.com", unique_suffix()),
        password: TEST_PASSWORD.to_string(),
        remember_me: false,
    };

    let response = server.post("/auth/login", &login).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register = RegisterRequest::unique();
    server.post("/auth/register", &register).await.unwrap();

    let mut login = LoginRequest::from_register(&register);
    login.password = "not-the-password".to_string();

    let response = server.post("/auth/login", &login).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_remember_me_extends_refresh_lifetime() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register = RegisterRequest::unique();
    server.post("/auth/register", &register).await.unwrap();

    let mut login = LoginRequest::from_register(&register);
    let short: AuthResponse = assert_json(
        server.post("/auth/login", &login).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    login.remember_me = true;
    let long: AuthResponse = assert_json(
        server.post("/auth/login", &login).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert!(long.refresh_expires_in > short.refresh_expires_in);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.register_and_login().await.unwrap();

    let body = json!({ "refresh_token": auth.refresh_token });
    let response = server.post("/auth/refresh", &body).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The consumed token is gone
    let response = server.post("/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.register_and_login().await.unwrap();

    let body = json!({ "refresh_token": auth.refresh_token });
    let response = server
        .post_auth("/auth/logout", &auth.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.post("/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/auth/me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_delete_and_recover_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (register, auth) = server.register_and_login().await.unwrap();

    let response = server
        .delete_auth("/auth/account", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let login = LoginRequest::from_register(&register);
    let response = server.post("/auth/login", &login).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "recoverable");
    assert_eq!(body["days_since_deletion"], 0);
    assert_eq!(body["days_left"], 30);

    let recover = json!({ "email": register.email, "password": register.password });
    let response = server.post("/auth/recover", &recover).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(user.deleted_at.is_none());

    let response = server.post("/auth/login", &login).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "authenticated");
}

// ============================================================================
// Role Tests
// ============================================================================

#[tokio::test]
async fn test_select_role_then_switch() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.signed_in_as("donor").await.unwrap();

    let response = server.get_auth("/auth/me", &auth.access_token).await.unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["user"]["role"], "donor");

    // Selecting again is a conflict; switching is the way to change
    let response = server
        .post_auth(
            "/auth/select-role",
            &auth.access_token,
            &json!({ "role": "patient" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ROLE_ALREADY_SELECTED");

    let response = server
        .post_auth("/auth/switch-role", &auth.access_token, &json!({}))
        .await
        .unwrap();
    let switched: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(switched["role"], "patient");
    assert_eq!(switched["destination"]["kind"], "complete_profile");
}

// ============================================================================
// Donor and Patient Tests
// ============================================================================

#[tokio::test]
async fn test_patient_finds_compatible_donor() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let city = unique_city();

    let (_, donor) = server.signed_in_as("donor").await.unwrap();
    let response = server
        .put_auth("/donors/me", &donor.access_token, &donor_profile("O-", &city))
        .await
        .unwrap();
    let saved: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(saved["donor"]["can_donate"], true);

    let (_, patient) = server.signed_in_as("patient").await.unwrap();
    let response = server
        .put_auth(
            "/patients/me",
            &patient.access_token,
            &patient_profile("AB+", &city),
        )
        .await
        .unwrap();
    let saved: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(saved["donors_notified"], 1);
    assert_eq!(saved["patient"]["is_urgent"], true);

    let response = server
        .get_auth("/patients/me/matches", &patient.access_token)
        .await
        .unwrap();
    let matches: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["blood_group"], "O-");
    let donor_id = matches[0]["id"].as_i64().unwrap();

    let response = server
        .get_auth(&format!("/patients/me/donors/{donor_id}"), &patient.access_token)
        .await
        .unwrap();
    let detail: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail["is_compatible"], true);

    // The donor sees the request on their dashboard
    let response = server
        .get_auth("/donors/me/matches", &donor.access_token)
        .await
        .unwrap();
    let requests: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["blood_group_required"], "AB+");
}

#[tokio::test]
async fn test_incompatible_donor_not_matched() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let city = unique_city();

    let (_, donor) = server.signed_in_as("donor").await.unwrap();
    server
        .put_auth("/donors/me", &donor.access_token, &donor_profile("AB+", &city))
        .await
        .unwrap();

    let (_, patient) = server.signed_in_as("patient").await.unwrap();
    server
        .put_auth(
            "/patients/me",
            &patient.access_token,
            &patient_profile("O-", &city),
        )
        .await
        .unwrap();

    let response = server
        .get_auth("/patients/me/matches", &patient.access_token)
        .await
        .unwrap();
    let matches: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_recorded_donation_blocks_matching() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let city = unique_city();

    let (_, donor) = server.signed_in_as("donor").await.unwrap();
    server
        .put_auth("/donors/me", &donor.access_token, &donor_profile("A+", &city))
        .await
        .unwrap();

    let response = server
        .post_auth("/donors/me/donations", &donor.access_token, &json!({}))
        .await
        .unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["can_donate"], false);
    assert_eq!(updated["days_until_eligible"], 90);

    let (_, patient) = server.signed_in_as("patient").await.unwrap();
    server
        .put_auth(
            "/patients/me",
            &patient.access_token,
            &patient_profile("A+", &city),
        )
        .await
        .unwrap();

    let response = server
        .get_auth("/patients/me/matches", &patient.access_token)
        .await
        .unwrap();
    let matches: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_search_donors_by_city() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let city = unique_city();

    for group in ["O+", "B+"] {
        let (_, donor) = server.signed_in_as("donor").await.unwrap();
        server
            .put_auth("/donors/me", &donor.access_token, &donor_profile(group, &city))
            .await
            .unwrap();
    }

    let (_, patient) = server.signed_in_as("patient").await.unwrap();
    server
        .put_auth(
            "/patients/me",
            &patient.access_token,
            &patient_profile("A+", &city),
        )
        .await
        .unwrap();

    let path = format!("/patients/me/search?city={}", city.replace(' ', "%20"));
    let response = server.get_auth(&path, &patient.access_token).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();

    // B+ cannot give to A+
    let donors = page["data"].as_array().unwrap();
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["blood_group"], "O+");
}

#[tokio::test]
async fn test_patient_routes_need_patient_role() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, donor) = server.signed_in_as("donor").await.unwrap();

    let response = server
        .get_auth("/patients/me/matches", &donor.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ROLE_REQUIRED");
}

// ============================================================================
// Admin and Public Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_donor() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, donor) = server.signed_in_as("donor").await.unwrap();

    let response = server
        .get_auth("/admin/stats", &donor.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ADMIN_REQUIRED");
}

#[tokio::test]
async fn test_submit_feedback() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.post("/feedback", &feedback()).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(body["rating"], 5);
    assert_eq!(body["is_resolved"], false);
}

#[tokio::test]
async fn test_compatibility_chart() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/compatibility").await.unwrap();
    let chart: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(chart["can_donate_to"]["O-"].as_array().unwrap().len(), 8);
    assert_eq!(chart["can_receive_from"]["AB+"].as_array().unwrap().len(), 8);
}
