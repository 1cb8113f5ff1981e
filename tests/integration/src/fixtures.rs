//! Test fixtures and data generators
//!
//! Request bodies are built as JSON so the tests exercise the wire format
//! rather than the server's own DTO types.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Password used by every account the tests register
pub const TEST_PASSWORD: &str = "donate-blood-2024";

/// Unique suffix so parallel runs never collide on emails or cities
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// A city no other test uses, keeping match results isolated
pub fn unique_city() -> String {
    format!("Testcity {}", unique_suffix())
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        Self {
            email: format!("user_{}@example.com", unique_suffix()),
            password: TEST_PASSWORD.to_string(),
            phone: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
            remember_me: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: Option<String>,
    pub is_active: bool,
    pub is_blocked: bool,
    pub deleted_at: Option<String>,
}

/// Tokens plus user, as returned by login, refresh, and role changes
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub user: UserResponse,
}

/// Donor profile body for a 30-year-old who has never donated
pub fn donor_profile(blood_group: &str, city: &str) -> Value {
    let date_of_birth = (Utc::now() - Duration::days(30 * 365 + 8)).date_naive();
    json!({
        "full_name": "Integration Donor",
        "blood_group": blood_group,
        "date_of_birth": date_of_birth,
        "gender": "F",
        "city": city,
        "state": "Maharashtra",
        "pincode": "411001",
    })
}

/// Patient request due in three days
pub fn patient_profile(blood_group: &str, city: &str) -> Value {
    let required_by = (Utc::now() + Duration::days(3)).date_naive();
    json!({
        "full_name": "Integration Patient",
        "blood_group_required": blood_group,
        "units_required": 2,
        "hospital_name": "Ruby Hall Clinic",
        "city": city,
        "state": "Maharashtra",
        "urgency_level": "critical",
        "required_by_date": required_by,
    })
}

pub fn feedback() -> Value {
    json!({
        "name": "Integration Tester",
        "email": format!("feedback_{}@example.com", unique_suffix()),
        "subject": "Great platform",
        "message": "Found a donor within an hour. Thank you!",
        "rating": 5,
    })
}
