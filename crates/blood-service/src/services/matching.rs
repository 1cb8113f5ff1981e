//! Matcher
//!
//! Pairs patients with compatible donors (and the reverse) using the
//! compatibility table, the eligibility predicates, and a case-insensitive
//! city substring match. Every predicate is part of the repository query, so
//! page limits only ever cut matching rows. Notification is a side effect of
//! profile saves and never fails the save.

use std::collections::BTreeMap;

use blood_core::entities::{Donor, Patient};
use blood_core::rules::{can_donate_to, latest_eligible_donation};
use blood_core::traits::{DonorSearch, Page, PatientSearch};
use blood_core::{BloodGroup, DomainError};
use tracing::{info, instrument, warn};

use crate::dto::{
    DonorDetailResponse, DonorResponse, DonorSearchQuery, PaginatedResponse, PaginationQuery,
    StatisticsResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notifier::{DeliveryChannel, Notification};

/// Matching service
pub struct MatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MatchService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Available compatible donors in the patient's city, capped at the dashboard limit
    #[instrument(skip(self, patient), fields(patient_id = patient.id))]
    pub async fn find_donors_for_patient(&self, patient: &Patient) -> ServiceResult<Vec<Donor>> {
        let page = Page::first(self.ctx.settings().matching.match_limit);
        let search = self.donor_search(patient, false, page);
        Ok(self.ctx.donor_repo().search(&search).await?)
    }

    /// Urgent, unfulfilled patients in the donor's city the donor can give to
    #[instrument(skip(self, donor), fields(donor_id = donor.id))]
    pub async fn find_patients_for_donor(&self, donor: &Donor) -> ServiceResult<Vec<Patient>> {
        let page = Page::first(self.ctx.settings().matching.match_limit);
        let search = self.patient_search(donor, page);
        Ok(self.ctx.patient_repo().search(&search).await?)
    }

    /// Tell eligible matching donors about a patient, then tell the patient
    /// how many donors were contacted
    ///
    /// Returns the number of donors contacted. Failures are logged, not raised.
    #[instrument(skip(self, patient), fields(patient_id = patient.id))]
    pub async fn notify_matching_donors(&self, patient: &Patient) -> usize {
        if !self.ctx.settings().notification.notify_matches {
            return 0;
        }
        match self.try_notify_donors(patient).await {
            Ok(count) => {
                info!(donors_notified = count, "Notified matching donors");
                count
            }
            Err(e) => {
                warn!(error = %e, "Error notifying matching donors");
                0
            }
        }
    }

    /// Tell urgent matching patients that a donor is available
    ///
    /// Returns the number of patients contacted. Failures are logged, not raised.
    #[instrument(skip(self, donor), fields(donor_id = donor.id))]
    pub async fn notify_matching_patients(&self, donor: &Donor) -> usize {
        if !self.ctx.settings().notification.notify_matches {
            return 0;
        }
        match self.try_notify_patients(donor).await {
            Ok(count) => {
                info!(patients_notified = count, "Notified matching patients");
                count
            }
            Err(e) => {
                warn!(error = %e, "Error notifying matching patients");
                0
            }
        }
    }

    /// Patient-facing donor search
    ///
    /// An explicit blood group narrows the search to that group; otherwise all
    /// groups compatible with the patient are searched.
    #[instrument(skip(self, patient, query), fields(patient_id = patient.id))]
    pub async fn search_donors(
        &self,
        patient: &Patient,
        query: DonorSearchQuery,
    ) -> ServiceResult<PaginatedResponse<DonorResponse>> {
        let pagination = PaginationQuery {
            page: query.page,
            per_page: query.per_page,
        };
        let page = pagination.page();
        let blood_groups = match query.blood_group {
            Some(group) => vec![group],
            None => patient.compatible_donor_groups().to_vec(),
        };

        let search = DonorSearch {
            blood_groups,
            city: query.city,
            state: query.state,
            available_only: query.available_only.unwrap_or(true),
            last_donation_on_or_before: None,
            page,
        };
        let donors = self.ctx.donor_repo().search(&search).await?;

        let now = self.ctx.now();
        let data = donors
            .iter()
            .map(|donor| DonorResponse::new(donor, now))
            .collect();
        Ok(PaginatedResponse::new(
            data,
            pagination.page.unwrap_or(1),
            page.limit,
        ))
    }

    /// One donor as seen by a patient
    #[instrument(skip(self, patient), fields(patient_id = patient.id))]
    pub async fn donor_detail(
        &self,
        patient: &Patient,
        donor_id: i64,
    ) -> ServiceResult<DonorDetailResponse> {
        let donor = self
            .ctx
            .donor_repo()
            .find_by_id(donor_id)
            .await?
            .ok_or(DomainError::DonorNotFound(donor_id))?;

        Ok(DonorDetailResponse::for_recipient(
            &donor,
            patient.blood_group_required,
            self.ctx.now(),
        ))
    }

    /// Platform-wide counters for the admin dashboard
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> ServiceResult<StatisticsResponse> {
        let mut blood_group_distribution: BTreeMap<BloodGroup, i64> =
            BloodGroup::ALL.into_iter().map(|group| (group, 0)).collect();
        for (group, total) in self.ctx.donor_repo().count_by_blood_group().await? {
            blood_group_distribution.insert(group, total);
        }

        Ok(StatisticsResponse {
            total_users: self.ctx.user_repo().count().await?,
            total_donors: self.ctx.donor_repo().count().await?,
            available_donors: self.ctx.donor_repo().count_available().await?,
            total_patients: self.ctx.patient_repo().count().await?,
            fulfilled_patients: self.ctx.patient_repo().count_fulfilled().await?,
            open_feedback: self.ctx.feedback_repo().count_unresolved().await?,
            blood_group_distribution,
        })
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Compatible available donors in the patient's city; with
    /// `eligible_only`, donors still cooling down are left out too
    fn donor_search(&self, patient: &Patient, eligible_only: bool, page: Page) -> DonorSearch {
        DonorSearch {
            blood_groups: patient.compatible_donor_groups().to_vec(),
            city: Some(patient.city.clone()),
            state: None,
            available_only: true,
            last_donation_on_or_before: eligible_only
                .then(|| latest_eligible_donation(self.ctx.now())),
            page,
        }
    }

    fn patient_search(&self, donor: &Donor, page: Page) -> PatientSearch {
        PatientSearch {
            blood_groups: can_donate_to(donor.blood_group).to_vec(),
            city: Some(donor.city.clone()),
            unfulfilled_only: true,
            required_by_on_or_after: Some(self.ctx.now().date_naive()),
            page,
        }
    }

    /// Every donor the patient's request should reach, read page by page
    async fn all_eligible_donors(&self, patient: &Patient) -> ServiceResult<Vec<Donor>> {
        let mut donors = Vec::new();
        for number in 1.. {
            let page = Page::new(number, Page::MAX_LIMIT);
            let search = self.donor_search(patient, true, page);
            let batch = self.ctx.donor_repo().search(&search).await?;
            let done = (batch.len() as i64) < page.limit;
            donors.extend(batch);
            if done {
                break;
            }
        }
        Ok(donors)
    }

    /// Every urgent patient the donor can help, read page by page
    async fn all_urgent_patients(&self, donor: &Donor) -> ServiceResult<Vec<Patient>> {
        let mut patients = Vec::new();
        for number in 1.. {
            let page = Page::new(number, Page::MAX_LIMIT);
            let search = self.patient_search(donor, page);
            let batch = self.ctx.patient_repo().search(&search).await?;
            let done = (batch.len() as i64) < page.limit;
            patients.extend(batch);
            if done {
                break;
            }
        }
        Ok(patients)
    }

    async fn email_of(&self, user_id: i64) -> ServiceResult<Option<String>> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .map(|user| user.email)
            .filter(|email| !email.is_empty()))
    }

    async fn try_notify_donors(&self, patient: &Patient) -> ServiceResult<usize> {
        let donors = self.all_eligible_donors(patient).await?;

        let mut count = 0;
        for donor in &donors {
            let Some(email) = self.email_of(donor.user_id).await? else {
                continue;
            };
            let message = Notification::new(
                format!("Urgent: {} blood needed", patient.blood_group_required),
                format!(
                    "Dear {}, {} needs {} blood at {} in {}, {}. Urgency: {}. Required by {}.",
                    donor.full_name,
                    patient.full_name,
                    patient.blood_group_required,
                    patient.hospital_name,
                    patient.city,
                    patient.state,
                    patient.urgency_level,
                    patient.required_by_date,
                ),
            );
            self.deliver(&email, &message).await;
            count += 1;
        }

        if count > 0 {
            if let Some(email) = self.email_of(patient.user_id).await? {
                let message = Notification::new(
                    "Matching donors found",
                    format!(
                        "Dear {}, we notified {count} compatible donor(s) in {} about your {} request.",
                        patient.full_name, patient.city, patient.blood_group_required,
                    ),
                );
                self.deliver(&email, &message).await;
            }
        }

        Ok(count)
    }

    async fn try_notify_patients(&self, donor: &Donor) -> ServiceResult<usize> {
        let patients = self.all_urgent_patients(donor).await?;

        let mut count = 0;
        for patient in &patients {
            let Some(email) = self.email_of(patient.user_id).await? else {
                continue;
            };
            let message = Notification::new(
                format!("A {} donor is available", donor.blood_group),
                format!(
                    "Dear {}, {} ({}) in {}, {} is available to donate.",
                    patient.full_name, donor.full_name, donor.blood_group, donor.city, donor.state,
                ),
            );
            self.deliver(&email, &message).await;
            count += 1;
        }

        Ok(count)
    }

    async fn deliver(&self, email: &str, message: &Notification) {
        let delivered = self
            .ctx
            .notifier()
            .send(DeliveryChannel::Email, email, message)
            .await;
        if !delivered {
            warn!(recipient = email, subject = %message.subject, "Match notification not delivered");
        }
    }
}
