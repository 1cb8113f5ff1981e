//! Donor entity <-> model mapper

use blood_core::entities::Donor;
use blood_core::error::DomainError;
use blood_core::value_objects::BloodGroup;

use crate::models::{BloodGroupCountModel, DonorModel};
use crate::repositories::corrupt_column;

impl TryFrom<DonorModel> for Donor {
    type Error = DomainError;

    fn try_from(model: DonorModel) -> Result<Self, Self::Error> {
        let blood_group = BloodGroup::parse(&model.blood_group)
            .ok_or_else(|| corrupt_column("donors.blood_group", &model.blood_group))?;

        Ok(Donor {
            id: model.id,
            user_id: model.user_id,
            full_name: model.full_name,
            blood_group,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            address: model.address,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            last_donation_date: model.last_donation_date,
            is_available: model.is_available,
            medical_history: model.medical_history,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl BloodGroupCountModel {
    pub fn into_pair(self) -> Result<(BloodGroup, i64), DomainError> {
        let group = BloodGroup::parse(&self.blood_group)
            .ok_or_else(|| corrupt_column("donors.blood_group", &self.blood_group))?;
        Ok((group, self.total))
    }
}
