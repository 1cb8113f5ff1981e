//! Outbound notification seam
//!
//! Email and SMS transports live behind [`Notifier`]. A send reports plain
//! success or failure; callers decide whether a failure matters.

use async_trait::async_trait;
use blood_core::OtpChannel;
use serde::Serialize;
use tracing::info;

/// Transport a message goes out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Email,
    Sms,
}

impl From<OtpChannel> for DeliveryChannel {
    fn from(channel: OtpChannel) -> Self {
        match channel {
            OtpChannel::Email => Self::Email,
            OtpChannel::Phone => Self::Sms,
        }
    }
}

/// Message body handed to a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to `destination`; `false` means it was not delivered
    async fn send(
        &self,
        channel: DeliveryChannel,
        destination: &str,
        message: &Notification,
    ) -> bool;
}

/// Notifier for deployments without a mail or SMS provider
///
/// Records the subject and recipient and reports every send as undelivered,
/// so OTP codes take the operator-log fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        channel: DeliveryChannel,
        destination: &str,
        message: &Notification,
    ) -> bool {
        info!(
            ?channel,
            destination,
            subject = %message.subject,
            "No transport configured; notification not delivered"
        );
        false
    }
}
