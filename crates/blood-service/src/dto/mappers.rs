//! Entity to DTO mappers
//!
//! Plain conversions use `From`. Donor and patient responses carry derived
//! eligibility fields, so they take the reference instant explicitly.

use std::collections::BTreeMap;

use blood_core::entities::{Donor, Feedback, NewFeedback, Patient, PatientProfile, User};
use blood_core::rules::{can_donate_to, compatible_donors};
use blood_core::{BloodGroup, DonorProfile};
use chrono::{DateTime, Utc};

use super::requests::{DonorProfileRequest, FeedbackRequest, PatientProfileRequest};
use super::responses::{
    CompatibilityChart, DonorDetailResponse, DonorResponse, FeedbackResponse, PatientResponse,
    UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_verified: user.is_verified,
            is_active: user.is_active,
            is_blocked: user.is_blocked,
            deleted_at: user.deleted_at,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Donor Mappers
// ============================================================================

impl DonorResponse {
    pub fn new(donor: &Donor, now: DateTime<Utc>) -> Self {
        Self {
            id: donor.id,
            user_id: donor.user_id,
            full_name: donor.full_name.clone(),
            blood_group: donor.blood_group,
            date_of_birth: donor.date_of_birth,
            age: donor.age(now),
            gender: donor.gender.clone(),
            address: donor.address.clone(),
            city: donor.city.clone(),
            state: donor.state.clone(),
            pincode: donor.pincode.clone(),
            last_donation_date: donor.last_donation_date,
            is_available: donor.is_available,
            can_donate: donor.can_donate(now),
            days_until_eligible: donor.days_until_eligible(now),
            medical_history: donor.medical_history.clone(),
            created_at: donor.created_at,
            updated_at: donor.updated_at,
        }
    }
}

impl DonorDetailResponse {
    /// Donor as seen by a patient needing `required`
    pub fn for_recipient(donor: &Donor, required: BloodGroup, now: DateTime<Utc>) -> Self {
        Self {
            is_compatible: donor.can_give_to(required),
            donor: DonorResponse::new(donor, now),
        }
    }
}

impl From<DonorProfileRequest> for DonorProfile {
    fn from(request: DonorProfileRequest) -> Self {
        Self {
            full_name: request.full_name.trim().to_string(),
            blood_group: request.blood_group,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            address: request.address,
            city: request.city.trim().to_string(),
            state: request.state.trim().to_string(),
            pincode: request.pincode,
            last_donation_date: request.last_donation_date,
            is_available: request.is_available,
            medical_history: request.medical_history,
        }
    }
}

// ============================================================================
// Patient Mappers
// ============================================================================

impl PatientResponse {
    pub fn new(patient: &Patient, now: DateTime<Utc>) -> Self {
        Self {
            id: patient.id,
            user_id: patient.user_id,
            full_name: patient.full_name.clone(),
            blood_group_required: patient.blood_group_required,
            units_required: patient.units_required,
            hospital_name: patient.hospital_name.clone(),
            location: patient.location.clone(),
            city: patient.city.clone(),
            state: patient.state.clone(),
            pincode: patient.pincode.clone(),
            urgency_level: patient.urgency_level,
            required_by_date: patient.required_by_date,
            days_remaining: patient.days_remaining(now),
            is_urgent: patient.is_urgent(now),
            medical_condition: patient.medical_condition.clone(),
            is_fulfilled: patient.is_fulfilled,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

impl From<PatientProfileRequest> for PatientProfile {
    fn from(request: PatientProfileRequest) -> Self {
        Self {
            full_name: request.full_name.trim().to_string(),
            blood_group_required: request.blood_group_required,
            units_required: request.units_required,
            hospital_name: request.hospital_name.trim().to_string(),
            location: request.location,
            city: request.city.trim().to_string(),
            state: request.state.trim().to_string(),
            pincode: request.pincode,
            urgency_level: request.urgency_level,
            required_by_date: request.required_by_date,
            medical_condition: request.medical_condition,
        }
    }
}

// ============================================================================
// Feedback Mappers
// ============================================================================

impl From<&Feedback> for FeedbackResponse {
    fn from(feedback: &Feedback) -> Self {
        Self {
            id: feedback.id,
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            subject: feedback.subject.clone(),
            message: feedback.message.clone(),
            rating: feedback.rating,
            is_resolved: feedback.is_resolved,
            admin_response: feedback.admin_response.clone(),
            created_at: feedback.created_at,
            resolved_at: feedback.resolved_at,
        }
    }
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self::from(&feedback)
    }
}

impl From<FeedbackRequest> for NewFeedback {
    fn from(request: FeedbackRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            subject: request.subject.trim().to_string(),
            message: request.message,
            rating: request.rating,
        }
    }
}

// ============================================================================
// Reference Data
// ============================================================================

impl CompatibilityChart {
    pub fn build() -> Self {
        let can_donate_to: BTreeMap<_, _> = BloodGroup::ALL
            .into_iter()
            .map(|group| (group, can_donate_to(group).to_vec()))
            .collect();
        let can_receive_from: BTreeMap<_, _> = BloodGroup::ALL
            .into_iter()
            .map(|group| (group, compatible_donors(group).to_vec()))
            .collect();

        Self {
            can_donate_to,
            can_receive_from,
        }
    }
}
