//! Donor service
//!
//! Profile management for accounts acting as donors.

use blood_core::entities::{Donor, DonorProfile};
use blood_core::rules::{age_on, donor_age_allowed};
use blood_core::{DomainError, Role};
use tracing::{info, instrument};

use crate::dto::{
    AvailabilityRequest, DonorProfileRequest, DonorProfileSaved, DonorResponse, PatientResponse,
    RecordDonationRequest,
};

use super::access::{load_actor, require_role};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::matching::MatchService;

/// Donor service
pub struct DonorService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DonorService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create or update the caller's donor profile
    ///
    /// Saving makes the account a donor and tells urgent compatible patients.
    #[instrument(skip(self, request), fields(blood_group = %request.blood_group))]
    pub async fn save_profile(
        &self,
        user_id: i64,
        request: DonorProfileRequest,
    ) -> ServiceResult<DonorProfileSaved> {
        let mut user = load_actor(self.ctx, user_id).await?;
        if user.role.is_privileged() {
            return Err(DomainError::RoleRequired(Role::Donor).into());
        }

        let now = self.ctx.now();
        let profile = DonorProfile::from(request);
        if !donor_age_allowed(profile.date_of_birth, now) {
            return Err(DomainError::DonorAgeOutOfRange {
                age: age_on(profile.date_of_birth, now.date_naive()),
            }
            .into());
        }
        if profile
            .last_donation_date
            .is_some_and(|date| date > now.date_naive())
        {
            return Err(DomainError::DonationDateInFuture.into());
        }

        let donor = match self.ctx.donor_repo().find_by_user(user_id).await? {
            Some(mut donor) => {
                donor.apply(profile, now);
                self.ctx.donor_repo().update(&donor).await?;
                info!(donor_id = donor.id, "Donor profile updated");
                donor
            }
            None => {
                let donor = self.ctx.donor_repo().create(user_id, &profile).await?;
                info!(donor_id = donor.id, "Donor profile created");
                donor
            }
        };

        if user.role != Role::Donor {
            user.role = Role::Donor;
            self.ctx.user_repo().update(&user).await?;
        }

        let patients_notified = MatchService::new(self.ctx)
            .notify_matching_patients(&donor)
            .await;

        Ok(DonorProfileSaved {
            donor: DonorResponse::new(&donor, now),
            patients_notified,
        })
    }

    /// The caller's donor profile
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: i64) -> ServiceResult<DonorResponse> {
        let donor = self.own_donor(user_id).await?;
        Ok(DonorResponse::new(&donor, self.ctx.now()))
    }

    /// Set availability, or flip it when no value is given
    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        user_id: i64,
        request: AvailabilityRequest,
    ) -> ServiceResult<DonorResponse> {
        let mut donor = self.own_donor(user_id).await?;
        let now = self.ctx.now();

        donor.is_available = request.is_available.unwrap_or(!donor.is_available);
        donor.updated_at = now;
        self.ctx.donor_repo().update(&donor).await?;

        info!(donor_id = donor.id, is_available = donor.is_available, "Availability changed");
        if donor.is_available {
            MatchService::new(self.ctx)
                .notify_matching_patients(&donor)
                .await;
        }

        Ok(DonorResponse::new(&donor, now))
    }

    /// Record a donation, which restarts the cooldown
    #[instrument(skip(self))]
    pub async fn record_donation(
        &self,
        user_id: i64,
        request: RecordDonationRequest,
    ) -> ServiceResult<DonorResponse> {
        let mut donor = self.own_donor(user_id).await?;
        let now = self.ctx.now();
        let date = request.donation_date.unwrap_or_else(|| now.date_naive());
        if date > now.date_naive() {
            return Err(DomainError::DonationDateInFuture.into());
        }

        donor.last_donation_date = Some(date);
        donor.updated_at = now;
        self.ctx.donor_repo().update(&donor).await?;

        info!(donor_id = donor.id, %date, "Donation recorded");
        Ok(DonorResponse::new(&donor, now))
    }

    /// Donor dashboard: urgent patients this donor can help
    #[instrument(skip(self))]
    pub async fn matches(&self, user_id: i64) -> ServiceResult<Vec<PatientResponse>> {
        let donor = self.own_donor(user_id).await?;
        let patients = MatchService::new(self.ctx)
            .find_patients_for_donor(&donor)
            .await?;

        let now = self.ctx.now();
        Ok(patients
            .iter()
            .map(|patient| PatientResponse::new(patient, now))
            .collect())
    }

    async fn own_donor(&self, user_id: i64) -> ServiceResult<Donor> {
        let user = load_actor(self.ctx, user_id).await?;
        require_role(&user, Role::Donor)?;
        Ok(self
            .ctx
            .donor_repo()
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::DonorProfileMissing)?)
    }
}
