//! Patient service
//!
//! Blood requests, the patient dashboard, and donor search.

use blood_core::entities::{Patient, PatientProfile};
use blood_core::{DomainError, Role};
use tracing::{info, instrument};

use crate::dto::{
    DonorDetailResponse, DonorResponse, DonorSearchQuery, PaginatedResponse, PatientProfileRequest,
    PatientProfileSaved, PatientResponse,
};

use super::access::{load_actor, require_role};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::matching::MatchService;

/// Patient service
pub struct PatientService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PatientService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create or update the caller's blood request
    ///
    /// Saving makes the account a patient and tells eligible compatible donors.
    #[instrument(skip(self, request), fields(blood_group = %request.blood_group_required))]
    pub async fn save_profile(
        &self,
        user_id: i64,
        request: PatientProfileRequest,
    ) -> ServiceResult<PatientProfileSaved> {
        let mut user = load_actor(self.ctx, user_id).await?;
        if user.role.is_privileged() {
            return Err(DomainError::RoleRequired(Role::Patient).into());
        }

        let now = self.ctx.now();
        let profile = PatientProfile::from(request);
        if profile.required_by_date < now.date_naive() {
            return Err(DomainError::RequiredByDateInPast.into());
        }

        let patient = match self.ctx.patient_repo().find_by_user(user_id).await? {
            Some(mut patient) => {
                patient.apply(profile, now);
                self.ctx.patient_repo().update(&patient).await?;
                info!(patient_id = patient.id, "Patient request updated");
                patient
            }
            None => {
                let patient = self.ctx.patient_repo().create(user_id, &profile).await?;
                info!(patient_id = patient.id, "Patient request created");
                patient
            }
        };

        if user.role != Role::Patient {
            user.role = Role::Patient;
            self.ctx.user_repo().update(&user).await?;
        }

        let donors_notified = MatchService::new(self.ctx)
            .notify_matching_donors(&patient)
            .await;

        Ok(PatientProfileSaved {
            patient: PatientResponse::new(&patient, now),
            donors_notified,
        })
    }

    /// The caller's blood request
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: i64) -> ServiceResult<PatientResponse> {
        let patient = self.own_patient(user_id).await?;
        Ok(PatientResponse::new(&patient, self.ctx.now()))
    }

    /// Patient dashboard: available compatible donors nearby
    #[instrument(skip(self))]
    pub async fn matches(&self, user_id: i64) -> ServiceResult<Vec<DonorResponse>> {
        let patient = self.own_patient(user_id).await?;
        let donors = MatchService::new(self.ctx)
            .find_donors_for_patient(&patient)
            .await?;

        let now = self.ctx.now();
        info!(patient_id = patient.id, matches = donors.len(), "Donor matches found");
        Ok(donors
            .iter()
            .map(|donor| DonorResponse::new(donor, now))
            .collect())
    }

    #[instrument(skip(self, query))]
    pub async fn search_donors(
        &self,
        user_id: i64,
        query: DonorSearchQuery,
    ) -> ServiceResult<PaginatedResponse<DonorResponse>> {
        let patient = self.own_patient(user_id).await?;
        MatchService::new(self.ctx)
            .search_donors(&patient, query)
            .await
    }

    #[instrument(skip(self))]
    pub async fn donor_detail(
        &self,
        user_id: i64,
        donor_id: i64,
    ) -> ServiceResult<DonorDetailResponse> {
        let patient = self.own_patient(user_id).await?;
        MatchService::new(self.ctx)
            .donor_detail(&patient, donor_id)
            .await
    }

    async fn own_patient(&self, user_id: i64) -> ServiceResult<Patient> {
        let user = load_actor(self.ctx, user_id).await?;
        require_role(&user, Role::Patient)?;
        Ok(self
            .ctx
            .patient_repo()
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::PatientProfileMissing)?)
    }
}
