//! Patient entity <-> model mapper

use blood_core::entities::Patient;
use blood_core::error::DomainError;
use blood_core::value_objects::{BloodGroup, UrgencyLevel};

use crate::models::PatientModel;
use crate::repositories::corrupt_column;

impl TryFrom<PatientModel> for Patient {
    type Error = DomainError;

    fn try_from(model: PatientModel) -> Result<Self, Self::Error> {
        let blood_group_required = BloodGroup::parse(&model.blood_group_required).ok_or_else(
            || corrupt_column("patients.blood_group_required", &model.blood_group_required),
        )?;
        let urgency_level = UrgencyLevel::parse(&model.urgency_level)
            .ok_or_else(|| corrupt_column("patients.urgency_level", &model.urgency_level))?;

        Ok(Patient {
            id: model.id,
            user_id: model.user_id,
            full_name: model.full_name,
            blood_group_required,
            units_required: model.units_required,
            hospital_name: model.hospital_name,
            location: model.location,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            urgency_level,
            required_by_date: model.required_by_date,
            medical_condition: model.medical_condition,
            is_fulfilled: model.is_fulfilled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn model(blood_group: &str, urgency: &str) -> PatientModel {
        PatientModel {
            id: 1,
            user_id: 2,
            full_name: "Asha".to_string(),
            blood_group_required: blood_group.to_string(),
            units_required: 2,
            hospital_name: "City Hospital".to_string(),
            location: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: None,
            urgency_level: urgency.to_string(),
            required_by_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            medical_condition: None,
            is_fulfilled: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_enumerated_columns() {
        let patient = Patient::try_from(model("AB-", "critical")).unwrap();
        assert_eq!(patient.blood_group_required, BloodGroup::AbNegative);
        assert_eq!(patient.urgency_level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_rejects_unknown_blood_group() {
        let err = Patient::try_from(model("C+", "normal")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
