//! Time source for every time-windowed rule (OTP expiry, rate limit,
//! donation cooldown, recovery window).

use std::fmt;

use chrono::{DateTime, Utc};

/// Source of the reference "now" passed to domain predicates
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
