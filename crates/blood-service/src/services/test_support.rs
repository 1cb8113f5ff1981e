//! In-memory ports and a pre-wired context for service tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use blood_common::auth::{hash_password, JwtService};
use blood_core::entities::{
    Donor, DonorProfile, Feedback, NewFeedback, NewOtp, NewUser, Otp, Patient, PatientProfile,
    PendingLogin, RefreshTokenData, User,
};
use blood_core::traits::{
    DonorRepository, DonorSearch, FeedbackRepository, OtpRepository, Page, PatientRepository,
    PatientSearch, PendingLoginStore, RefreshTokenStore, RepoResult, UserQuery, UserRepository,
};
use blood_core::{BloodGroup, DomainError, OtpOwner, OtpPurpose, Role, UrgencyLevel};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::clock::Clock;
use super::context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
use super::notifier::{DeliveryChannel, Notification, Notifier};

/// Password every seeded account uses
pub const PASSWORD: &str = "correct-horse-battery";

fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

fn page_of<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(0);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

fn contains_ci(haystack: &str, needle: Option<&String>) -> bool {
    needle.map_or(true, |needle| {
        haystack
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
    })
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Mutex::new(at))
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ManualClock::now(self)
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<(User, String)>>,
    clock: Option<Arc<ManualClock>>,
}

impl InMemoryUsers {
    fn with_clock(clock: Arc<ManualClock>) -> Self {
        Self {
            rows: Mutex::default(),
            clock: Some(clock),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.as_ref().map_or_else(Utc::now, |clock| clock.now())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let now = self.now();
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        let created = User {
            id: i64::try_from(rows.len()).unwrap() + 1,
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_verified: true,
            is_active: true,
            is_blocked: false,
            deleted_at: None,
            created_at: now,
            last_login: None,
        };
        rows.push((created.clone(), password_hash.to_string()));
        Ok(created)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|(u, _)| u.id == user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        row.0 = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.id == id).map(|(_, h)| h.clone()))
    }

    async fn list(&self, query: &UserQuery) -> RepoResult<Vec<User>> {
        let rows = self.rows.lock().unwrap();
        let mut users: Vec<User> = rows
            .iter()
            .map(|(u, _)| u.clone())
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .filter(|u| contains_ci(&u.email, query.search.as_ref()))
            .collect();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(page_of(users, query.page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(i64::try_from(self.rows.lock().unwrap().len()).unwrap())
    }
}

#[derive(Default)]
pub struct InMemoryDonors {
    rows: Mutex<Vec<Donor>>,
}

#[async_trait]
impl DonorRepository for InMemoryDonors {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Donor>> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Donor>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, profile: &DonorProfile) -> RepoResult<Donor> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let donor = Donor {
            id: i64::try_from(rows.len()).unwrap() + 1,
            user_id,
            full_name: profile.full_name.clone(),
            blood_group: profile.blood_group,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender.clone(),
            address: profile.address.clone(),
            city: profile.city.clone(),
            state: profile.state.clone(),
            pincode: profile.pincode.clone(),
            last_donation_date: profile.last_donation_date,
            is_available: profile.is_available,
            medical_history: profile.medical_history.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.push(donor.clone());
        Ok(donor)
    }

    async fn update(&self, donor: &Donor) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|d| d.id == donor.id)
            .ok_or(DomainError::DonorNotFound(donor.id))?;
        *row = donor.clone();
        Ok(())
    }

    async fn search(&self, query: &DonorSearch) -> RepoResult<Vec<Donor>> {
        let rows = self.rows.lock().unwrap();
        let donors: Vec<Donor> = rows
            .iter()
            .filter(|d| query.blood_groups.contains(&d.blood_group))
            .filter(|d| !query.available_only || d.is_available)
            .filter(|d| contains_ci(&d.city, query.city.as_ref()))
            .filter(|d| contains_ci(&d.state, query.state.as_ref()))
            .filter(|d| match (query.last_donation_on_or_before, d.last_donation_date) {
                (Some(cutoff), Some(last)) => last <= cutoff,
                _ => true,
            })
            .cloned()
            .collect();
        Ok(page_of(donors, query.page))
    }

    async fn list(&self, page: Page) -> RepoResult<Vec<Donor>> {
        let mut donors = self.rows.lock().unwrap().clone();
        donors.reverse();
        Ok(page_of(donors, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(i64::try_from(self.rows.lock().unwrap().len()).unwrap())
    }

    async fn count_available(&self) -> RepoResult<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(i64::try_from(rows.iter().filter(|d| d.is_available).count()).unwrap())
    }

    async fn count_by_blood_group(&self) -> RepoResult<Vec<(BloodGroup, i64)>> {
        let rows = self.rows.lock().unwrap();
        let mut counts: HashMap<BloodGroup, i64> = HashMap::new();
        for donor in rows.iter() {
            *counts.entry(donor.blood_group).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InMemoryPatients {
    rows: Mutex<Vec<Patient>>,
}

#[async_trait]
impl PatientRepository for InMemoryPatients {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Patient>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Patient>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, profile: &PatientProfile) -> RepoResult<Patient> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let patient = Patient {
            id: i64::try_from(rows.len()).unwrap() + 1,
            user_id,
            full_name: profile.full_name.clone(),
            blood_group_required: profile.blood_group_required,
            units_required: profile.units_required,
            hospital_name: profile.hospital_name.clone(),
            location: profile.location.clone(),
            city: profile.city.clone(),
            state: profile.state.clone(),
            pincode: profile.pincode.clone(),
            urgency_level: profile.urgency_level,
            required_by_date: profile.required_by_date,
            medical_condition: profile.medical_condition.clone(),
            is_fulfilled: false,
            created_at: now,
            updated_at: now,
        };
        rows.push(patient.clone());
        Ok(patient)
    }

    async fn update(&self, patient: &Patient) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == patient.id)
            .ok_or(DomainError::PatientNotFound(patient.id))?;
        *row = patient.clone();
        Ok(())
    }

    async fn search(&self, query: &PatientSearch) -> RepoResult<Vec<Patient>> {
        let rows = self.rows.lock().unwrap();
        let patients: Vec<Patient> = rows
            .iter()
            .filter(|p| query.blood_groups.contains(&p.blood_group_required))
            .filter(|p| !query.unfulfilled_only || !p.is_fulfilled)
            .filter(|p| contains_ci(&p.city, query.city.as_ref()))
            .filter(|p| {
                query
                    .required_by_on_or_after
                    .map_or(true, |since| p.required_by_date >= since)
            })
            .cloned()
            .collect();
        Ok(page_of(patients, query.page))
    }

    async fn list(&self, page: Page) -> RepoResult<Vec<Patient>> {
        let mut patients = self.rows.lock().unwrap().clone();
        patients.reverse();
        Ok(page_of(patients, page))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(i64::try_from(self.rows.lock().unwrap().len()).unwrap())
    }

    async fn count_fulfilled(&self) -> RepoResult<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(i64::try_from(rows.iter().filter(|p| p.is_fulfilled).count()).unwrap())
    }
}

/// OTP ledger whose `created_at` follows the manual clock
pub struct InMemoryOtps {
    rows: Mutex<Vec<Otp>>,
    clock: Arc<ManualClock>,
}

impl InMemoryOtps {
    fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            rows: Mutex::default(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtps {
    async fn count_created_since(&self, owner: &OtpOwner, since: DateTime<Utc>) -> RepoResult<i64> {
        let rows = self.rows.lock().unwrap();
        let count = rows
            .iter()
            .filter(|otp| otp.owned_by(owner) && otp.created_at >= since)
            .count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn replace(&self, owner: &OtpOwner, otp: &NewOtp) -> RepoResult<Otp> {
        let mut rows = self.rows.lock().unwrap();
        for existing in rows.iter_mut().filter(|o| !o.is_used && o.owned_by(owner)) {
            existing.is_used = true;
        }
        let created = Otp {
            id: i64::try_from(rows.len()).unwrap() + 1,
            user_id: otp.user_id,
            email: otp.email.clone(),
            phone: otp.phone.clone(),
            code_hash: otp.code_hash.clone(),
            purpose: otp.purpose,
            expires_at: otp.expires_at,
            is_used: false,
            created_at: self.clock.now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn latest_unused(
        &self,
        owner: &OtpOwner,
        purpose: OtpPurpose,
    ) -> RepoResult<Option<Otp>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|otp| !otp.is_used && otp.purpose == purpose && otp.owned_by(owner))
            .max_by_key(|otp| (otp.created_at, otp.id))
            .cloned())
    }

    async fn mark_used(&self, id: i64) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|otp| otp.id == id && !otp.is_used) {
            Some(otp) => {
                otp.is_used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryFeedback {
    rows: Mutex<Vec<Feedback>>,
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedback {
    async fn create(&self, feedback: &NewFeedback) -> RepoResult<Feedback> {
        let mut rows = self.rows.lock().unwrap();
        let created = Feedback {
            id: i64::try_from(rows.len()).unwrap() + 1,
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            subject: feedback.subject.clone(),
            message: feedback.message.clone(),
            rating: feedback.rating,
            is_resolved: false,
            admin_response: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Feedback>> {
        Ok(self.rows.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn update(&self, feedback: &Feedback) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|f| f.id == feedback.id)
            .ok_or(DomainError::FeedbackNotFound(feedback.id))?;
        *row = feedback.clone();
        Ok(())
    }

    async fn list(&self, resolved: Option<bool>, page: Page) -> RepoResult<Vec<Feedback>> {
        let rows = self.rows.lock().unwrap();
        let feedback: Vec<Feedback> = rows
            .iter()
            .rev()
            .filter(|f| resolved.map_or(true, |resolved| f.is_resolved == resolved))
            .cloned()
            .collect();
        Ok(page_of(feedback, page))
    }

    async fn count_unresolved(&self) -> RepoResult<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(i64::try_from(rows.iter().filter(|f| !f.is_resolved).count()).unwrap())
    }
}

// ============================================================================
// Session stores
// ============================================================================

#[derive(Default)]
pub struct InMemoryPendingLogins {
    rows: Mutex<HashMap<String, PendingLogin>>,
}

#[async_trait]
impl PendingLoginStore for InMemoryPendingLogins {
    async fn put(&self, token: &str, pending: &PendingLogin) -> RepoResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(token.to_string(), pending.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> RepoResult<Option<PendingLogin>> {
        Ok(self.rows.lock().unwrap().get(token).cloned())
    }

    async fn remove(&self, token: &str) -> RepoResult<bool> {
        Ok(self.rows.lock().unwrap().remove(token).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokens {
    rows: Mutex<HashMap<String, (RefreshTokenData, u64)>>,
}

impl InMemoryRefreshTokens {
    pub fn ttl_of(&self, token: &str) -> Option<u64> {
        self.rows.lock().unwrap().get(token).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokens {
    async fn store(&self, token: &str, data: &RefreshTokenData, ttl_seconds: u64) -> RepoResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(token.to_string(), (data.clone(), ttl_seconds));
        Ok(())
    }

    async fn validate(&self, token: &str) -> RepoResult<Option<RefreshTokenData>> {
        Ok(self.rows.lock().unwrap().get(token).map(|(data, _)| data.clone()))
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.rows.lock().unwrap().remove(token).is_some())
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> RepoResult<u32> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, (data, _)| data.user_id != user_id);
        Ok(u32::try_from(before - rows.len()).unwrap())
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Keeps every message and reports it as delivered
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(DeliveryChannel, String, Notification)>>,
}

impl RecordingNotifier {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn has_recipient(&self, destination: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|(_, to, _)| to == destination)
    }

    pub fn was_sent(&self, destination: &str, subject: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|(_, to, message)| to == destination && message.subject == subject)
    }

    /// The six-digit code in the newest message to `destination`
    pub fn last_code_for(&self, destination: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter()
            .rev()
            .filter(|(_, to, _)| to == destination)
            .find_map(|(_, _, message)| {
                message
                    .body
                    .split(|c: char| !c.is_ascii_digit())
                    .find(|word| word.len() == blood_core::OTP_LENGTH)
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        channel: DeliveryChannel,
        destination: &str,
        message: &Notification,
    ) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((channel, destination.to_string(), message.clone()));
        true
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A service context over in-memory ports, with handles to inspect them
pub struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryUsers>,
    pub donors: Arc<InMemoryDonors>,
    pub patients: Arc<InMemoryPatients>,
    pub otps: Arc<InMemoryOtps>,
    pub feedback: Arc<InMemoryFeedback>,
    pub pending_logins: Arc<InMemoryPendingLogins>,
    pub refresh_tokens: Arc<InMemoryRefreshTokens>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    pub fn with_settings(configure: impl FnOnce(&mut ServiceSettings)) -> Self {
        let mut settings = ServiceSettings::default();
        configure(&mut settings);

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ));
        let users = Arc::new(InMemoryUsers::with_clock(clock.clone()));
        let donors = Arc::new(InMemoryDonors::default());
        let patients = Arc::new(InMemoryPatients::default());
        let otps = Arc::new(InMemoryOtps::new(clock.clone()));
        let feedback = Arc::new(InMemoryFeedback::default());
        let pending_logins = Arc::new(InMemoryPendingLogins::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokens::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let jwt = Arc::new(JwtService::new(
            "test-secret-key-that-is-at-least-32-bytes",
            900,
            86_400,
            2_592_000,
        ));

        let ctx = ServiceContextBuilder::new()
            .user_repo(users.clone())
            .donor_repo(donors.clone())
            .patient_repo(patients.clone())
            .otp_repo(otps.clone())
            .feedback_repo(feedback.clone())
            .pending_logins(pending_logins.clone())
            .refresh_tokens(refresh_tokens.clone())
            .jwt_service(jwt)
            .notifier(notifier.clone())
            .clock(clock.clone())
            .settings(settings)
            .build()
            .unwrap();

        Self {
            ctx,
            clock,
            users,
            donors,
            patients,
            otps,
            feedback,
            pending_logins,
            refresh_tokens,
            notifier,
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        futures::executor::block_on(future)
    }

    /// Seed an active, verified account that logs in with [`PASSWORD`]
    pub fn add_user(&self, email: &str, role: Role) -> User {
        let new_user = NewUser {
            email: email.to_string(),
            phone: None,
            role,
        };
        Self::block_on(self.users.create(&new_user, &password_hash())).unwrap()
    }

    pub fn user(&self, id: i64) -> User {
        Self::block_on(self.users.find_by_id(id)).unwrap().unwrap()
    }

    pub fn edit_user(&self, id: i64, edit: impl FnOnce(&mut User)) {
        let mut user = self.user(id);
        edit(&mut user);
        Self::block_on(self.users.update(&user)).unwrap();
    }

    /// Seed an available donor aged 30 who has never donated
    pub fn add_donor(&self, user_id: i64, blood_group: BloodGroup, city: &str) -> Donor {
        let profile = DonorProfile {
            full_name: format!("Donor {user_id}"),
            blood_group,
            date_of_birth: NaiveDate::from_ymd_opt(1994, 1, 1).unwrap(),
            gender: "M".to_string(),
            address: None,
            city: city.to_string(),
            state: "Maharashtra".to_string(),
            pincode: "411001".to_string(),
            last_donation_date: None,
            is_available: true,
            medical_history: None,
        };
        Self::block_on(self.donors.create(user_id, &profile)).unwrap()
    }

    pub fn donor(&self, id: i64) -> Donor {
        Self::block_on(DonorRepository::find_by_id(self.donors.as_ref(), id))
            .unwrap()
            .unwrap()
    }

    pub fn edit_donor(&self, id: i64, edit: impl FnOnce(&mut Donor)) {
        let mut donor = self.donor(id);
        edit(&mut donor);
        Self::block_on(self.donors.update(&donor)).unwrap();
    }

    /// Seed an open request due a week from the clock's today
    pub fn add_patient(&self, user_id: i64, blood_group: BloodGroup, city: &str) -> Patient {
        let profile = PatientProfile {
            full_name: format!("Patient {user_id}"),
            blood_group_required: blood_group,
            units_required: 1,
            hospital_name: "City Hospital".to_string(),
            location: None,
            city: city.to_string(),
            state: "Maharashtra".to_string(),
            pincode: None,
            urgency_level: UrgencyLevel::Normal,
            required_by_date: self.clock.now().date_naive() + Duration::days(7),
            medical_condition: None,
        };
        Self::block_on(self.patients.create(user_id, &profile)).unwrap()
    }

    pub fn edit_patient(&self, id: i64, edit: impl FnOnce(&mut Patient)) {
        let mut patient = Self::block_on(PatientRepository::find_by_id(self.patients.as_ref(), id))
            .unwrap()
            .unwrap();
        edit(&mut patient);
        Self::block_on(self.patients.update(&patient)).unwrap();
    }

    pub fn add_feedback(&self, feedback: NewFeedback) -> Feedback {
        Self::block_on(self.feedback.create(&feedback)).unwrap()
    }
}
