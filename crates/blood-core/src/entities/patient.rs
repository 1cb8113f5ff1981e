//! Patient blood request - owned by a user, cascade-deleted with it

use chrono::{DateTime, NaiveDate, Utc};

use crate::rules::{compatible_donors, days_remaining, patient_is_urgent};
use crate::value_objects::{BloodGroup, UrgencyLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group_required: BloodGroup,
    pub units_required: i32,
    pub hospital_name: String,
    pub location: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub urgency_level: UrgencyLevel,
    pub required_by_date: NaiveDate,
    pub medical_condition: Option<String>,
    pub is_fulfilled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable patient fields, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfile {
    pub full_name: String,
    pub blood_group_required: BloodGroup,
    pub units_required: i32,
    pub hospital_name: String,
    pub location: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub urgency_level: UrgencyLevel,
    pub required_by_date: NaiveDate,
    pub medical_condition: Option<String>,
}

impl Patient {
    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        patient_is_urgent(self.required_by_date, now)
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_remaining(self.required_by_date, now)
    }

    /// Donor groups that can serve this request
    pub fn compatible_donor_groups(&self) -> &'static [BloodGroup] {
        compatible_donors(self.blood_group_required)
    }

    pub fn apply(&mut self, profile: PatientProfile, now: DateTime<Utc>) {
        self.full_name = profile.full_name;
        self.blood_group_required = profile.blood_group_required;
        self.units_required = profile.units_required;
        self.hospital_name = profile.hospital_name;
        self.location = profile.location;
        self.city = profile.city;
        self.state = profile.state;
        self.pincode = profile.pincode;
        self.urgency_level = profile.urgency_level;
        self.required_by_date = profile.required_by_date;
        self.medical_condition = profile.medical_condition;
        self.updated_at = now;
    }
}
