//! Patient request urgency

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgently a patient needs blood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical,
    Urgent,
    #[default]
    Normal,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Urgent => "Urgent",
            Self::Normal => "Normal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Critical" => Some(Self::Critical),
            "Urgent" => Some(Self::Urgent),
            "Normal" => Some(Self::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
