//! OTP value objects - purpose tags, delivery channels, and owner keys

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a one-time code was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Email address verification
    Email,
    PasswordReset,
    LoginEmail,
    LoginPhone,
}

impl OtpPurpose {
    /// Tag stored in the `otp_type` column
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PasswordReset => "password_reset",
            Self::LoginEmail => "login_email",
            Self::LoginPhone => "login_phone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(Self::Email),
            "password_reset" => Some(Self::PasswordReset),
            "login_email" => Some(Self::LoginEmail),
            "login_phone" => Some(Self::LoginPhone),
            _ => None,
        }
    }

    /// Login purpose for a delivery channel
    pub fn login_via(channel: OtpChannel) -> Self {
        match channel {
            OtpChannel::Email => Self::LoginEmail,
            OtpChannel::Phone => Self::LoginPhone,
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery channel for a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpChannel {
    #[default]
    Email,
    Phone,
}

/// Key that groups OTP records for supersede and rate-limit purposes
///
/// Mirrors the precedence used when a record carries several identifiers:
/// user id first, then email, then phone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OtpOwner {
    User(i64),
    Email(String),
    Phone(String),
}

impl fmt::Display for OtpOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Email(email) => write!(f, "email:{email}"),
            Self::Phone(phone) => write!(f, "phone:{phone}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_tags() {
        for purpose in [
            OtpPurpose::Email,
            OtpPurpose::PasswordReset,
            OtpPurpose::LoginEmail,
            OtpPurpose::LoginPhone,
        ] {
            assert_eq!(OtpPurpose::parse(purpose.as_str()), Some(purpose));
        }
        assert_eq!(OtpPurpose::login_via(OtpChannel::Phone), OtpPurpose::LoginPhone);
    }

    #[test]
    fn test_owner_display() {
        assert_eq!(OtpOwner::User(7).to_string(), "user:7");
        assert_eq!(OtpOwner::Email("a@b.c".into()).to_string(), "email:a@b.c");
    }
}
