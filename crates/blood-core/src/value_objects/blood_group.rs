//! Blood group value object - the eight ABO/Rh types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight ABO/Rh blood types
///
/// Stored as its display string (`"AB+"`, `"O-"`, ...) in the database and in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// All blood groups, in the order used for listings and statistics
    pub const ALL: [BloodGroup; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }

    /// Parse a blood group, returning `None` for anything outside the eight types
    ///
    /// Accepts the Unicode minus sign as well as ASCII `-`.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace('\u{2212}', "-").to_ascii_uppercase();
        Self::ALL.into_iter().find(|g| g.as_str() == normalized)
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known blood group
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown blood group: {0}")]
pub struct BloodGroupParseError(pub String);

impl FromStr for BloodGroup {
    type Err = BloodGroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| BloodGroupParseError(s.to_string()))
    }
}
