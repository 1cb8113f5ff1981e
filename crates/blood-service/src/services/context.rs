//! Service context - dependency container for services
//!
//! Holds all repositories, session stores, and other dependencies needed by services.

use std::sync::Arc;

use blood_common::auth::JwtService;
use blood_common::{AppConfig, AuthPolicyConfig, MatchingConfig, NotificationConfig, OtpConfig};
use blood_core::traits::{
    DonorRepository, FeedbackRepository, OtpRepository, PatientRepository, PendingLoginStore,
    RefreshTokenStore, UserRepository,
};
use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::error::{ServiceError, ServiceResult};
use super::notifier::{LogNotifier, Notifier};

/// Policy knobs the services read at call time
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub otp: OtpConfig,
    pub auth: AuthPolicyConfig,
    pub notification: NotificationConfig,
    pub matching: MatchingConfig,
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            otp: config.otp.clone(),
            auth: config.auth.clone(),
            notification: config.notification.clone(),
            matching: config.matching.clone(),
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Redis-backed session stores
/// - JWT service for authentication
/// - The notification transport and the clock
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    donor_repo: Arc<dyn DonorRepository>,
    patient_repo: Arc<dyn PatientRepository>,
    otp_repo: Arc<dyn OtpRepository>,
    feedback_repo: Arc<dyn FeedbackRepository>,

    // Session stores
    pending_logins: Arc<dyn PendingLoginStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,

    // Services
    jwt_service: Arc<JwtService>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,

    settings: ServiceSettings,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the donor repository
    pub fn donor_repo(&self) -> &dyn DonorRepository {
        self.donor_repo.as_ref()
    }

    /// Get the patient repository
    pub fn patient_repo(&self) -> &dyn PatientRepository {
        self.patient_repo.as_ref()
    }

    /// Get the OTP repository
    pub fn otp_repo(&self) -> &dyn OtpRepository {
        self.otp_repo.as_ref()
    }

    /// Get the feedback repository
    pub fn feedback_repo(&self) -> &dyn FeedbackRepository {
        self.feedback_repo.as_ref()
    }

    // === Session Stores ===

    /// Get the pending login store
    pub fn pending_logins(&self) -> &dyn PendingLoginStore {
        self.pending_logins.as_ref()
    }

    /// Get the refresh token store
    pub fn refresh_tokens(&self) -> &dyn RefreshTokenStore {
        self.refresh_tokens.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("session_stores", &"...")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    donor_repo: Option<Arc<dyn DonorRepository>>,
    patient_repo: Option<Arc<dyn PatientRepository>>,
    otp_repo: Option<Arc<dyn OtpRepository>>,
    feedback_repo: Option<Arc<dyn FeedbackRepository>>,
    pending_logins: Option<Arc<dyn PendingLoginStore>>,
    refresh_tokens: Option<Arc<dyn RefreshTokenStore>>,
    jwt_service: Option<Arc<JwtService>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn donor_repo(mut self, repo: Arc<dyn DonorRepository>) -> Self {
        self.donor_repo = Some(repo);
        self
    }

    pub fn patient_repo(mut self, repo: Arc<dyn PatientRepository>) -> Self {
        self.patient_repo = Some(repo);
        self
    }

    pub fn otp_repo(mut self, repo: Arc<dyn OtpRepository>) -> Self {
        self.otp_repo = Some(repo);
        self
    }

    pub fn feedback_repo(mut self, repo: Arc<dyn FeedbackRepository>) -> Self {
        self.feedback_repo = Some(repo);
        self
    }

    pub fn pending_logins(mut self, store: Arc<dyn PendingLoginStore>) -> Self {
        self.pending_logins = Some(store);
        self
    }

    pub fn refresh_tokens(mut self, store: Arc<dyn RefreshTokenStore>) -> Self {
        self.refresh_tokens = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Defaults to [`LogNotifier`]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Defaults to [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` naming the first unset store
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            donor_repo: required(self.donor_repo, "donor_repo")?,
            patient_repo: required(self.patient_repo, "patient_repo")?,
            otp_repo: required(self.otp_repo, "otp_repo")?,
            feedback_repo: required(self.feedback_repo, "feedback_repo")?,
            pending_logins: required(self.pending_logins, "pending_logins")?,
            refresh_tokens: required(self.refresh_tokens, "refresh_tokens")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings: self.settings,
        })
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> ServiceResult<T> {
    value.ok_or(ServiceError::MissingDependency(name))
}
