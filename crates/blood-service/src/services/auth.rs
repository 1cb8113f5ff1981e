//! Authentication service
//!
//! Handles registration, the login state machine, OTP-gated privileged
//! logins, token refresh and logout, role selection, and the self-service
//! account lifecycle (delete and recover).

use blood_common::auth::{hash_password, validate_password_strength, verify_password};
use blood_common::{AppError, PrivilegedLoginPolicy};
use blood_core::entities::{normalize_email, NewUser, PendingLogin, RefreshTokenData, User};
use blood_core::rules::{RecoveryWindow, RECOVERY_WINDOW_DAYS};
use blood_core::{DomainError, OtpChannel, OtpOwner, OtpPurpose, Role};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CurrentUserResponse, Destination, DonorResponse, LoginOutcome, LoginRequest,
    LogoutRequest, PatientResponse, RecoverAccountRequest, RefreshTokenRequest, RegisterRequest,
    RoleChangeResponse, SelectRoleRequest, UserResponse, VerifyLoginOtpRequest,
};

use super::access::{ensure_usable, load_actor, mask_destination};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notifier::{DeliveryChannel, Notification};
use super::otp::OtpService;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account with no role selected yet
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        validate_password_strength(&request.password)?;

        let phone = request
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());
        let new_user = NewUser::registration(&request.email, phone);

        if self.ctx.user_repo().email_exists(&new_user.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = self.ctx.user_repo().create(&new_user, &password_hash).await?;

        info!(user_id = user.id, "User registered successfully");
        Ok(UserResponse::from(user))
    }

    /// Run the login state machine
    ///
    /// Checks run in a fixed order and the first failing one decides the
    /// outcome: email, admin phone (under the OTP policy), password, blocked,
    /// deleted, inactive, then role-specific routing.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginOutcome> {
        let email = normalize_email(&request.email);
        let Some(mut user) = self.ctx.user_repo().find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(DomainError::UnknownEmail.into());
        };

        let otp_policy =
            self.ctx.settings().auth.privileged_login == PrivilegedLoginPolicy::OtpChallenge;

        if otp_policy && user.role == Role::Admin {
            let phone_ok = request
                .phone
                .as_deref()
                .is_some_and(|phone| user.phone_matches(phone.trim()));
            if !phone_ok {
                warn!(user_id = user.id, "Login failed: admin phone mismatch");
                return Err(DomainError::InvalidCredentials.into());
            }
        }

        self.check_password(&user, &request.password).await?;

        let now = self.ctx.now();
        if user.is_blocked {
            warn!(user_id = user.id, "Login rejected: account blocked");
            return Err(DomainError::AccountBlocked.into());
        }

        match user.recovery_window(now) {
            RecoveryWindow::NotDeleted => {}
            RecoveryWindow::Recoverable {
                days_since_deletion,
            } => {
                info!(user_id = user.id, days_since_deletion, "Login on recoverable account");
                return Ok(LoginOutcome::Recoverable {
                    email: user.email,
                    days_since_deletion,
                    days_left: RECOVERY_WINDOW_DAYS - days_since_deletion,
                });
            }
            RecoveryWindow::Expired {
                days_since_deletion,
            } => {
                warn!(user_id = user.id, days_since_deletion, "Login rejected: account deleted");
                return Err(DomainError::AccountDeleted {
                    days_since_deletion,
                }
                .into());
            }
        }

        if !user.is_active {
            warn!(user_id = user.id, "Login rejected: account inactive");
            return Err(DomainError::AccountInactive.into());
        }

        if user.role.is_privileged() && otp_policy {
            return self.start_otp_challenge(&user, &request).await;
        }

        let destination = self.destination_for(&user, request.next).await?;
        let auth = self.establish_session(&mut user, request.remember_me).await?;
        if user.role.is_privileged() {
            self.notify_privileged_login(&user).await;
        }

        info!(user_id = user.id, role = %user.role, "User logged in successfully");
        Ok(LoginOutcome::Authenticated { auth, destination })
    }

    /// Second step of a privileged login
    ///
    /// A failed check leaves the pending login in place and sends no new code.
    #[instrument(skip(self, request))]
    pub async fn verify_login_otp(
        &self,
        request: VerifyLoginOtpRequest,
    ) -> ServiceResult<LoginOutcome> {
        let pending = self
            .ctx
            .pending_logins()
            .get(&request.pending_token)
            .await?
            .ok_or(DomainError::NoPendingLogin)?;

        OtpService::new(self.ctx)
            .verify(
                &OtpOwner::User(pending.user_id),
                OtpPurpose::login_via(pending.channel),
                &request.otp,
            )
            .await?;

        self.ctx.pending_logins().remove(&request.pending_token).await?;

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(pending.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(pending.user_id))?;
        ensure_usable(&user, self.ctx.now())?;

        let destination = self.destination_for(&user, pending.next).await?;
        let auth = self.establish_session(&mut user, pending.remember_me).await?;
        self.notify_privileged_login(&user).await;

        info!(user_id = user.id, role = %user.role, "Privileged login verified");
        Ok(LoginOutcome::Authenticated { auth, destination })
    }

    /// Rotate a refresh token
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        self.ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let refresh_data = self
            .ctx
            .refresh_tokens()
            .validate(&request.refresh_token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(refresh_data.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;
        ensure_usable(&user, self.ctx.now())?;

        self.ctx.refresh_tokens().revoke(&request.refresh_token).await?;
        let auth = self.issue_tokens(&user, refresh_data.remember_me).await?;

        info!(user_id = user.id, "Tokens refreshed successfully");
        Ok(auth)
    }

    /// Revoke one refresh token, or every token of the user when none is given
    #[instrument(skip(self, request))]
    pub async fn logout(&self, user_id: i64, request: LogoutRequest) -> ServiceResult<()> {
        if let Some(token) = request.refresh_token {
            self.ctx.refresh_tokens().revoke(&token).await?;
        } else {
            let revoked = self.ctx.refresh_tokens().revoke_all_for_user(user_id).await?;
            info!(user_id, revoked, "Revoked all sessions");
        }

        info!(user_id, "User logged out successfully");
        Ok(())
    }

    /// Reactivate a soft-deleted account inside its recovery window
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn recover_account(
        &self,
        request: RecoverAccountRequest,
    ) -> ServiceResult<UserResponse> {
        let email = normalize_email(&request.email);
        let mut user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::UnknownEmail)?;

        self.check_password(&user, &request.password).await?;

        match user.recovery_window(self.ctx.now()) {
            RecoveryWindow::NotDeleted => return Err(DomainError::AccountNotDeleted.into()),
            RecoveryWindow::Expired {
                days_since_deletion,
            } => {
                warn!(user_id = user.id, days_since_deletion, "Recovery window has passed");
                return Err(DomainError::AccountDeleted {
                    days_since_deletion,
                }
                .into());
            }
            RecoveryWindow::Recoverable { .. } => {}
        }

        user.restore();
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = user.id, "Account recovered");
        Ok(UserResponse::from(user))
    }

    /// Pick donor or patient for an account that has no role yet
    #[instrument(skip(self))]
    pub async fn select_role(
        &self,
        user_id: i64,
        request: SelectRoleRequest,
    ) -> ServiceResult<RoleChangeResponse> {
        let mut user = load_actor(self.ctx, user_id).await?;

        if !request.role.is_self_selectable() {
            return Err(DomainError::RoleNotSelectable(request.role).into());
        }
        if user.role != Role::Unset {
            return Err(DomainError::RoleAlreadySelected.into());
        }

        self.change_role(&mut user, request.role).await
    }

    /// Swap between donor and patient
    #[instrument(skip(self))]
    pub async fn switch_role(&self, user_id: i64) -> ServiceResult<RoleChangeResponse> {
        let mut user = load_actor(self.ctx, user_id).await?;
        let target = user
            .role
            .switched()
            .ok_or(DomainError::RoleSwitchNotAllowed(user.role))?;

        self.change_role(&mut user, target).await
    }

    /// Soft-delete the caller's own account
    ///
    /// The donor profile, if any, is taken out of matching and every refresh
    /// token is revoked.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: i64) -> ServiceResult<()> {
        let mut user = load_actor(self.ctx, user_id).await?;
        let now = self.ctx.now();

        user.soft_delete(now);
        self.ctx.user_repo().update(&user).await?;

        if let Some(mut donor) = self.ctx.donor_repo().find_by_user(user_id).await? {
            donor.is_available = false;
            donor.updated_at = now;
            self.ctx.donor_repo().update(&donor).await?;
        }

        self.ctx.refresh_tokens().revoke_all_for_user(user_id).await?;

        info!(user_id, "Account soft-deleted");
        Ok(())
    }

    /// The caller's account with whichever profiles exist
    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: i64) -> ServiceResult<CurrentUserResponse> {
        let user = load_actor(self.ctx, user_id).await?;
        let now = self.ctx.now();

        let donor = self
            .ctx
            .donor_repo()
            .find_by_user(user_id)
            .await?
            .map(|donor| DonorResponse::new(&donor, now));
        let patient = self
            .ctx
            .patient_repo()
            .find_by_user(user_id)
            .await?
            .map(|patient| PatientResponse::new(&patient, now));

        Ok(CurrentUserResponse {
            user: UserResponse::from(user),
            donor,
            patient,
        })
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    async fn check_password(&self, user: &User, password: &str) -> ServiceResult<()> {
        let Some(password_hash) = self.ctx.user_repo().get_password_hash(user.id).await? else {
            warn!(user_id = user.id, "Login failed: no password hash");
            return Err(DomainError::InvalidCredentials.into());
        };

        if !verify_password(password, &password_hash)? {
            warn!(user_id = user.id, "Login failed: invalid password");
            return Err(DomainError::InvalidCredentials.into());
        }
        Ok(())
    }

    async fn start_otp_challenge(
        &self,
        user: &User,
        request: &LoginRequest,
    ) -> ServiceResult<LoginOutcome> {
        let channel = match user.role {
            Role::SubAdmin => request.otp_channel,
            _ => OtpChannel::Email,
        };
        let destination = match channel {
            OtpChannel::Email => user.email.clone(),
            OtpChannel::Phone => user.phone.clone().ok_or(DomainError::PhoneNotOnFile)?,
        };

        let issued = OtpService::new(self.ctx)
            .send_challenge(
                &OtpOwner::User(user.id),
                OtpPurpose::login_via(channel),
                channel,
                &destination,
            )
            .await?;

        let pending_token = Uuid::new_v4().to_string();
        let pending = PendingLogin::new(user.id, channel, request.remember_me, request.next.clone());
        self.ctx.pending_logins().put(&pending_token, &pending).await?;

        info!(user_id = user.id, role = %user.role, ?channel, "Login OTP challenge issued");
        Ok(LoginOutcome::OtpRequired {
            pending_token,
            channel,
            sent_to: mask_destination(&destination),
            expires_at: issued.expires_at,
        })
    }

    /// Where an authenticated user lands
    async fn destination_for(&self, user: &User, next: Option<String>) -> ServiceResult<Destination> {
        let has_profile = match user.role {
            Role::Unset => return Ok(Destination::SelectRole),
            Role::Admin | Role::SubAdmin => true,
            Role::Donor => self.ctx.donor_repo().find_by_user(user.id).await?.is_some(),
            Role::Patient => self.ctx.patient_repo().find_by_user(user.id).await?.is_some(),
        };

        if !has_profile {
            return Ok(Destination::CompleteProfile { role: user.role });
        }

        Ok(match next.filter(|url| is_local_redirect(url)) {
            Some(url) => Destination::Redirect { url },
            None => Destination::Dashboard { role: user.role },
        })
    }

    /// Record the login and hand out a token pair
    async fn establish_session(
        &self,
        user: &mut User,
        remember_me: bool,
    ) -> ServiceResult<AuthResponse> {
        user.record_login(self.ctx.now());
        self.ctx.user_repo().update(user).await?;
        self.issue_tokens(user, remember_me).await
    }

    async fn issue_tokens(&self, user: &User, remember_me: bool) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        let token_pair = self.ctx.jwt_service().generate_token_pair(
            user.id,
            user.role,
            &session_id,
            remember_me,
        )?;

        let ttl = u64::try_from(token_pair.refresh_expires_in)
            .map_err(|_| ServiceError::Internal("refresh token expiry must be positive"))?;
        let refresh_data = RefreshTokenData::new(user.id, session_id, remember_me);
        self.ctx
            .refresh_tokens()
            .store(&token_pair.refresh_token, &refresh_data, ttl)
            .await?;

        Ok(AuthResponse::new(token_pair, UserResponse::from(user)))
    }

    async fn change_role(&self, user: &mut User, role: Role) -> ServiceResult<RoleChangeResponse> {
        let previous = user.role;
        user.role = role;
        self.ctx.user_repo().update(user).await?;

        let destination = self.destination_for(user, None).await?;
        let auth = self.issue_tokens(user, false).await?;

        info!(user_id = user.id, from = %previous, to = %role, "Role changed");
        Ok(RoleChangeResponse {
            role,
            destination,
            auth,
        })
    }

    /// Alert the operator address (and a sub-admin themselves) about a privileged login
    async fn notify_privileged_login(&self, user: &User) {
        let at = self.ctx.now().format("%Y-%m-%d %H:%M:%S UTC");
        let message = Notification::new(
            "Privileged login",
            format!("{} ({}) signed in at {at}.", user.email, user.role),
        );

        let mut recipients: Vec<&str> = Vec::new();
        if let Some(admin_email) = self.ctx.settings().notification.admin_email.as_deref() {
            recipients.push(admin_email);
        }
        if user.role == Role::SubAdmin {
            recipients.push(&user.email);
        }

        for recipient in recipients {
            let delivered = self
                .ctx
                .notifier()
                .send(DeliveryChannel::Email, recipient, &message)
                .await;
            if !delivered {
                warn!(user_id = user.id, recipient, "Login notification not delivered");
            }
        }
    }
}

/// Only same-site paths are honored as post-login redirects
///
/// Browsers read `\` as `/` and drop tabs and newlines, so either could turn
/// a path into a scheme-relative URL.
fn is_local_redirect(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.chars().any(|c| c == '\\' || c.is_control())
}
