//! Patient database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PatientModel {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group_required: String,
    pub units_required: i32,
    pub hospital_name: String,
    pub location: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub urgency_level: String,
    pub required_by_date: NaiveDate,
    pub medical_condition: Option<String>,
    pub is_fulfilled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
