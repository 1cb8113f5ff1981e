//! Donor database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DonorModel {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub last_donation_date: Option<NaiveDate>,
    pub is_available: bool,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the per-blood-group donor count
#[derive(Debug, Clone, FromRow)]
pub struct BloodGroupCountModel {
    pub blood_group: String,
    pub total: i64,
}
