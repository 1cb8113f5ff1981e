//! Time-windowed eligibility predicates
//!
//! Every function here is pure: callers pass the reference instant so that
//! login, recovery, and matching all agree on the same day arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Minimum days between two donations
pub const DONATION_COOLDOWN_DAYS: i64 = 90;

/// Days after soft deletion during which an account can be recovered
pub const RECOVERY_WINDOW_DAYS: i64 = 30;

/// Youngest and oldest age accepted at donor registration
pub const MIN_DONOR_AGE: i32 = 18;
pub const MAX_DONOR_AGE: i32 = 65;

/// True when the donor has never donated or the cooldown has fully elapsed
pub fn donor_can_donate(last_donation: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    match last_donation {
        None => true,
        Some(date) => (now.date_naive() - date).num_days() >= DONATION_COOLDOWN_DAYS,
    }
}

/// Most recent last-donation date that still allows donating at `now`
///
/// `donor_can_donate(Some(d), now)` holds exactly when `d` is on or before
/// this date, so queries can apply the cooldown before paging.
pub fn latest_eligible_donation(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() - Duration::days(DONATION_COOLDOWN_DAYS)
}

/// Days left until the donor may give again (zero when eligible)
pub fn days_until_eligible(last_donation: Option<NaiveDate>, now: DateTime<Utc>) -> i64 {
    last_donation.map_or(0, |date| {
        (DONATION_COOLDOWN_DAYS - (now.date_naive() - date).num_days()).max(0)
    })
}

/// A request is still urgent while its required-by date has not passed
pub fn patient_is_urgent(required_by: NaiveDate, now: DateTime<Utc>) -> bool {
    required_by >= now.date_naive()
}

/// Signed days until the required-by date (negative once it has passed)
pub fn days_remaining(required_by: NaiveDate, now: DateTime<Utc>) -> i64 {
    (required_by - now.date_naive()).num_days()
}

/// Where a soft-deleted account sits relative to its recovery window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecoveryWindow {
    NotDeleted,
    Recoverable { days_since_deletion: i64 },
    Expired { days_since_deletion: i64 },
}

impl RecoveryWindow {
    #[inline]
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable { .. })
    }
}

/// Classify an account's deletion timestamp
///
/// Whole elapsed days are compared, so exactly 30 days (to the second) is
/// still recoverable and 31 is not.
pub fn account_recovery_window(
    deleted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> RecoveryWindow {
    let Some(deleted_at) = deleted_at else {
        return RecoveryWindow::NotDeleted;
    };

    let days_since_deletion = (now - deleted_at).num_days();
    if days_since_deletion <= RECOVERY_WINDOW_DAYS {
        RecoveryWindow::Recoverable { days_since_deletion }
    } else {
        RecoveryWindow::Expired { days_since_deletion }
    }
}

/// Completed years between `date_of_birth` and `today`
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Whether someone born on `date_of_birth` may register as a donor today
pub fn donor_age_allowed(date_of_birth: NaiveDate, now: DateTime<Utc>) -> bool {
    (MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age_on(date_of_birth, now.date_naive()))
}
