//! OTP ledger
//!
//! Issues, delivers, and consumes one-time codes. Only the newest unused
//! record of an owner is ever checked, and a code is consumed by the same
//! conditional write that accepts it.

use std::fmt;

use blood_common::auth::{hash_otp_code, verify_otp_code};
use blood_core::entities::{generate_otp_code, NewOtp};
use blood_core::value_objects::{OtpChannel, OtpOwner, OtpPurpose};
use blood_core::DomainError;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notifier::{DeliveryChannel, Notification};

/// Length of the trailing rate-limit window
pub const RATE_LIMIT_WINDOW_MINUTES: i64 = 60;

/// A freshly issued code; the plaintext exists only here
#[derive(Clone)]
pub struct IssuedOtp {
    pub id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("id", &self.id)
            .field("code", &"******")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of checking a candidate code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerification {
    Success,
    /// No live record, or it was consumed concurrently
    NoMatchingRecord,
    Expired,
    CodeMismatch,
}

impl OtpVerification {
    /// Map a failed check onto its domain error
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Success => Ok(()),
            Self::NoMatchingRecord => Err(DomainError::OtpNotFound),
            Self::Expired => Err(DomainError::OtpExpired),
            Self::CodeMismatch => Err(DomainError::OtpMismatch),
        }
    }
}

/// OTP service
pub struct OtpService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OtpService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `true` while `owner` is below the hourly issue limit
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn check_rate_limit(&self, owner: &OtpOwner) -> ServiceResult<bool> {
        let since = self.ctx.now() - Duration::minutes(RATE_LIMIT_WINDOW_MINUTES);
        let issued = self.ctx.otp_repo().count_created_since(owner, since).await?;
        Ok(issued < self.ctx.settings().otp.max_requests_per_hour)
    }

    /// Supersede every unused record of `owner` and store a new code
    ///
    /// Callers check [`Self::check_rate_limit`] first.
    #[instrument(skip(self, destination), fields(owner = %owner, purpose = %purpose))]
    pub async fn issue(
        &self,
        owner: &OtpOwner,
        purpose: OtpPurpose,
        destination: Option<(OtpChannel, &str)>,
    ) -> ServiceResult<IssuedOtp> {
        let code = generate_otp_code();
        let code_hash = hash_otp_code(&code)?;
        let expires_at = self.ctx.now() + Duration::minutes(self.ctx.settings().otp.expiry_minutes);

        let (email, phone) = match destination {
            Some((OtpChannel::Email, address)) => (Some(address.to_string()), None),
            Some((OtpChannel::Phone, number)) => (None, Some(number.to_string())),
            None => (None, None),
        };
        let record = NewOtp::for_owner(owner, purpose, code_hash, expires_at)
            .with_destination(email, phone);
        let otp = self.ctx.otp_repo().replace(owner, &record).await?;

        info!(otp_id = otp.id, %expires_at, "OTP issued");
        Ok(IssuedOtp {
            id: otp.id,
            code,
            expires_at,
        })
    }

    /// Rate-limit, issue, and deliver a code in one step
    ///
    /// A failed delivery is not an error: the code is written to the
    /// `otp_fallback` log target so the challenge stays usable.
    #[instrument(skip(self, destination), fields(owner = %owner, purpose = %purpose, ?channel))]
    pub async fn send_challenge(
        &self,
        owner: &OtpOwner,
        purpose: OtpPurpose,
        channel: OtpChannel,
        destination: &str,
    ) -> ServiceResult<IssuedOtp> {
        if !self.check_rate_limit(owner).await? {
            warn!("OTP rate limit reached");
            return Err(ServiceError::Domain(DomainError::OtpRateLimited));
        }

        let issued = self.issue(owner, purpose, Some((channel, destination))).await?;
        let message = self.challenge_message(purpose, &issued.code);
        let delivered = self
            .ctx
            .notifier()
            .send(DeliveryChannel::from(channel), destination, &message)
            .await;

        if !delivered {
            warn!(
                target: "otp_fallback",
                owner = %owner,
                purpose = %purpose,
                destination,
                code = %issued.code,
                "OTP delivery failed; code recorded for operator"
            );
        }

        Ok(issued)
    }

    /// Check `code` against the newest live record and consume it on success
    #[instrument(skip(self, code), fields(owner = %owner, purpose = %purpose))]
    pub async fn check(
        &self,
        owner: &OtpOwner,
        purpose: OtpPurpose,
        code: &str,
    ) -> ServiceResult<OtpVerification> {
        let Some(otp) = self.ctx.otp_repo().latest_unused(owner, purpose).await? else {
            return Ok(OtpVerification::NoMatchingRecord);
        };

        if otp.is_expired(self.ctx.now()) {
            return Ok(OtpVerification::Expired);
        }

        if !verify_otp_code(code, &otp.code_hash)? {
            return Ok(OtpVerification::CodeMismatch);
        }

        if !self.ctx.otp_repo().mark_used(otp.id).await? {
            warn!(otp_id = otp.id, "OTP consumed by a concurrent verification");
            return Ok(OtpVerification::NoMatchingRecord);
        }

        info!(otp_id = otp.id, "OTP verified");
        Ok(OtpVerification::Success)
    }

    /// [`Self::check`], with every failure reported as a domain error
    pub async fn verify(&self, owner: &OtpOwner, purpose: OtpPurpose, code: &str) -> ServiceResult<()> {
        let outcome = self.check(owner, purpose, code).await?;
        if outcome != OtpVerification::Success {
            warn!(owner = %owner, purpose = %purpose, ?outcome, "OTP verification failed");
        }
        outcome.into_result().map_err(ServiceError::from)
    }

    fn challenge_message(&self, purpose: OtpPurpose, code: &str) -> Notification {
        let minutes = self.ctx.settings().otp.expiry_minutes;
        let subject = match purpose {
            OtpPurpose::Email => "Verify your email address",
            OtpPurpose::PasswordReset => "Password reset code",
            OtpPurpose::LoginEmail | OtpPurpose::LoginPhone => "Your login verification code",
        };
        Notification::new(
            subject,
            format!("Your verification code is {code}. It expires in {minutes} minutes."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Harness;

    const DEST: &str = "user@example.com";

    fn owner() -> OtpOwner {
        OtpOwner::Email(DEST.to_string())
    }

    async fn send(harness: &Harness) -> ServiceResult<IssuedOtp> {
        OtpService::new(&harness.ctx)
            .send_challenge(&owner(), OtpPurpose::Email, OtpChannel::Email, DEST)
            .await
    }

    fn wrong_code(code: &str) -> String {
        if code == "000000" {
            "111111".to_string()
        } else {
            "000000".to_string()
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let harness = Harness::new();
        let issued = send(&harness).await.unwrap();

        assert_eq!(harness.notifier.last_code_for(DEST), Some(issued.code.clone()));
        assert_eq!(issued.expires_at, harness.clock.now() + Duration::minutes(10));

        let outcome = OtpService::new(&harness.ctx)
            .check(&owner(), OtpPurpose::Email, &issued.code)
            .await
            .unwrap();
        assert_eq!(outcome, OtpVerification::Success);
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let harness = Harness::new();
        let issued = send(&harness).await.unwrap();
        let service = OtpService::new(&harness.ctx);

        service.verify(&owner(), OtpPurpose::Email, &issued.code).await.unwrap();
        let second = service
            .check(&owner(), OtpPurpose::Email, &issued.code)
            .await
            .unwrap();
        assert_eq!(second, OtpVerification::NoMatchingRecord);
    }

    #[tokio::test]
    async fn test_new_code_supersedes_old() {
        let harness = Harness::new();
        let first = send(&harness).await.unwrap();
        let second = send(&harness).await.unwrap();
        let service = OtpService::new(&harness.ctx);

        if first.code != second.code {
            let outcome = service
                .check(&owner(), OtpPurpose::Email, &first.code)
                .await
                .unwrap();
            assert_eq!(outcome, OtpVerification::CodeMismatch);
        }
        service.verify(&owner(), OtpPurpose::Email, &second.code).await.unwrap();
    }

    #[tokio::test]
    async fn test_superseded_across_purposes() {
        let harness = Harness::new();
        let service = OtpService::new(&harness.ctx);
        let reset = service
            .issue(&owner(), OtpPurpose::PasswordReset, None)
            .await
            .unwrap();
        service.issue(&owner(), OtpPurpose::Email, None).await.unwrap();

        let outcome = service
            .check(&owner(), OtpPurpose::PasswordReset, &reset.code)
            .await
            .unwrap();
        assert_eq!(outcome, OtpVerification::NoMatchingRecord);
    }

    #[tokio::test]
    async fn test_mismatch_keeps_record_live() {
        let harness = Harness::new();
        let issued = send(&harness).await.unwrap();
        let service = OtpService::new(&harness.ctx);

        let err = service
            .verify(&owner(), OtpPurpose::Email, &wrong_code(&issued.code))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "OTP_MISMATCH");
        service.verify(&owner(), OtpPurpose::Email, &issued.code).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_reported_before_mismatch() {
        let harness = Harness::new();
        let issued = send(&harness).await.unwrap();
        harness.clock.advance(Duration::minutes(10) + Duration::seconds(1));
        let service = OtpService::new(&harness.ctx);

        for code in [issued.code.clone(), wrong_code(&issued.code)] {
            let outcome = service.check(&owner(), OtpPurpose::Email, &code).await.unwrap();
            assert_eq!(outcome, OtpVerification::Expired);
        }
    }

    #[tokio::test]
    async fn test_hourly_rate_limit() {
        let harness = Harness::new();
        for _ in 0..3 {
            send(&harness).await.unwrap();
        }

        let err = send(&harness).await.unwrap_err();
        assert_eq!(err.error_code(), "OTP_RATE_LIMITED");
        assert_eq!(harness.notifier.sent_count(), 3);

        harness.clock.advance(Duration::minutes(61));
        assert!(send(&harness).await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_is_per_owner() {
        let harness = Harness::new();
        for _ in 0..3 {
            send(&harness).await.unwrap();
        }

        let other = OtpOwner::Email("other@example.com".to_string());
        assert!(OtpService::new(&harness.ctx)
            .check_rate_limit(&other)
            .await
            .unwrap());
    }

    #[test]
    fn test_issued_debug_hides_code() {
        let issued = IssuedOtp {
            id: 1,
            code: "123456".to_string(),
            expires_at: Utc::now(),
        };
        assert!(!format!("{issued:?}").contains("123456"));
    }
}
