//! Donor profile - owned by a user, cascade-deleted with it

use chrono::{DateTime, NaiveDate, Utc};

use crate::rules::{age_on, days_until_eligible, donor_can_donate, is_compatible};
use crate::value_objects::BloodGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donor {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub blood_group: BloodGroup,
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

/// Editable donor fields, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorProfile {
    pub full_name: String,
    pub blood_group: BloodGroup,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub last_donation_date: Option<NaiveDate>,
    pub is_available: bool,
    pub medical_history: Option<String>,
}

impl Donor {
    /// Donation cooldown has elapsed (or the donor never donated)
    pub fn can_donate(&self, now: DateTime<Utc>) -> bool {
        donor_can_donate(self.last_donation_date, now)
    }

    pub fn days_until_eligible(&self, now: DateTime<Utc>) -> i64 {
        days_until_eligible(self.last_donation_date, now)
    }

    pub fn age(&self, now: DateTime<Utc>) -> i32 {
        age_on(self.date_of_birth, now.date_naive())
    }

    /// Whether this donor's group can give to `recipient`
    pub fn can_give_to(&self, recipient: BloodGroup) -> bool {
        is_compatible(self.blood_group, recipient)
    }

    /// Overwrite the editable fields
    pub fn apply(&mut self, profile: DonorProfile, now: DateTime<Utc>) {
        self.full_name = profile.full_name;
        self.blood_group = profile.blood_group;
        self.date_of_birth = profile.date_of_birth;
        self.gender = profile.gender;
        self.address = profile.address;
        self.city = profile.city;
        self.state = profile.state;
        self.pincode = profile.pincode;
        self.last_donation_date = profile.last_donation_date;
        self.is_available = profile.is_available;
        self.medical_history = profile.medical_history;
        self.updated_at = now;
    }

    pub fn profile(&self) -> DonorProfile {
        DonorProfile {
            full_name: self.full_name.clone(),
            blood_group: self.blood_group,
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            last_donation_date: self.last_donation_date,
            is_available: self.is_available,
            medical_history: self.medical_history.clone(),
        }
    }
}
