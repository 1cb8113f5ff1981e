//! One-time passcode record
//!
//! Only a salted hash of the code is ever persisted.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::value_objects::{OtpOwner, OtpPurpose};

/// Number of digits in a code
pub const OTP_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otp {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub code_hash: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// Live: not consumed and strictly before its expiry instant
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && now < self.expires_at
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether this record belongs to `owner`
    pub fn owned_by(&self, owner: &OtpOwner) -> bool {
        match owner {
            OtpOwner::User(id) => self.user_id == Some(*id),
            OtpOwner::Email(email) => self.email.as_deref() == Some(email.as_str()),
            OtpOwner::Phone(phone) => self.phone.as_deref() == Some(phone.as_str()),
        }
    }
}

/// Record to insert when issuing a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOtp {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub code_hash: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
}

impl NewOtp {
    /// Build a record whose identifier columns cover at least `owner`
    pub fn for_owner(
        owner: &OtpOwner,
        purpose: OtpPurpose,
        code_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let (user_id, email, phone) = match owner {
            OtpOwner::User(id) => (Some(*id), None, None),
            OtpOwner::Email(email) => (None, Some(email.clone()), None),
            OtpOwner::Phone(phone) => (None, None, Some(phone.clone())),
        };
        Self {
            user_id,
            email,
            phone,
            code_hash,
            purpose,
            expires_at,
        }
    }

    /// Record the delivery address alongside the owner key
    #[must_use]
    pub fn with_destination(mut self, email: Option<String>, phone: Option<String>) -> Self {
        self.email = self.email.or(email);
        self.phone = self.phone.or(phone);
        self
    }
}

/// Generate a fixed-width numeric code; leading zeros are preserved
pub fn generate_otp_code() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn otp(expires_at: DateTime<Utc>) -> Otp {
        Otp {
            id: 1,
            user_id: Some(10),
            email: Some("sub@example.com".to_string()),
            phone: None,
            code_hash: "hash".to_string(),
            purpose: OtpPurpose::LoginEmail,
            expires_at,
            is_used: false,
            created_at: expires_at - Duration::minutes(10),
        }
    }

    #[test]
    fn test_validity_is_exclusive_at_expiry() {
        let expires = Utc::now();
        let record = otp(expires);
        assert!(record.is_valid(expires - Duration::seconds(1)));
        assert!(!record.is_valid(expires));
        assert!(record.is_expired(expires));
    }

    #[test]
    fn test_used_record_is_invalid() {
        let expires = Utc::now() + Duration::minutes(5);
        let mut record = otp(expires);
        record.is_used = true;
        assert!(!record.is_valid(Utc::now()));
    }

    #[test]
    fn test_owned_by() {
        let record = otp(Utc::now());
        assert!(record.owned_by(&OtpOwner::User(10)));
        assert!(record.owned_by(&OtpOwner::Email("sub@example.com".into())));
        assert!(!record.owned_by(&OtpOwner::Phone("123".into())));
    }

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..200 {
            let code = generate_otp_code();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_new_otp_for_owner_with_destination() {
        let record = NewOtp::for_owner(
            &OtpOwner::User(3),
            OtpPurpose::LoginPhone,
            "h".into(),
            Utc::now(),
        )
        .with_destination(None, Some("5551234567".into()));
        assert_eq!(record.user_id, Some(3));
        assert_eq!(record.phone.as_deref(), Some("5551234567"));
        assert!(record.email.is_none());
    }
}
