//! Feedback submitted through the public contact form

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub rating: Option<i16>,
    pub is_resolved: bool,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub rating: Option<i16>,
}

impl Feedback {
    /// Attach an admin response and resolve
    pub fn respond(&mut self, response: String, now: DateTime<Utc>) {
        self.admin_response = Some(response);
        self.is_resolved = true;
        self.resolved_at = Some(now);
    }

    /// Flip the resolved flag, stamping or clearing `resolved_at`
    pub fn toggle_resolved(&mut self, now: DateTime<Utc>) {
        self.is_resolved = !self.is_resolved;
        self.resolved_at = self.is_resolved.then_some(now);
    }
}
