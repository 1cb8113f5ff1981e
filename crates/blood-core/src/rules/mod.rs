//! Domain rules - compatibility lookups and eligibility predicates

pub mod compatibility;
pub mod eligibility;

pub use compatibility::{can_donate_to, compatible_donors, compatible_donors_for, is_compatible};
pub use eligibility::{
    account_recovery_window, age_on, days_remaining, days_until_eligible, donor_age_allowed,
    donor_can_donate, latest_eligible_donation, patient_is_urgent, RecoveryWindow, DONATION_COOLDOWN_DAYS,
    RECOVERY_WINDOW_DAYS,
};
