//! OTP entity <-> model mapper

use blood_core::entities::Otp;
use blood_core::error::DomainError;
use blood_core::value_objects::{OtpOwner, OtpPurpose};

use crate::models::OtpModel;
use crate::repositories::corrupt_column;

impl TryFrom<OtpModel> for Otp {
    type Error = DomainError;

    fn try_from(model: OtpModel) -> Result<Self, Self::Error> {
        let purpose = OtpPurpose::parse(&model.otp_type)
            .ok_or_else(|| corrupt_column("otps.otp_type", &model.otp_type))?;

        Ok(Otp {
            id: model.id,
            user_id: model.user_id,
            email: model.email,
            phone: model.phone,
            code_hash: model.otp_hash,
            purpose,
            expires_at: model.expires_at,
            is_used: model.is_used,
            created_at: model.created_at,
        })
    }
}

/// Column and bind value that select the records of an owner
pub fn owner_filter(owner: &OtpOwner) -> (&'static str, OwnerValue<'_>) {
    match owner {
        OtpOwner::User(id) => ("user_id", OwnerValue::Id(*id)),
        OtpOwner::Email(email) => ("email", OwnerValue::Text(email)),
        OtpOwner::Phone(phone) => ("phone", OwnerValue::Text(phone)),
    }
}

/// Typed bind value for [`owner_filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerValue<'a> {
    Id(i64),
    Text(&'a str),
}
