//! Account role - drives every authorization and routing decision

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a user account
///
/// `Unset` is the state of a freshly registered account until the user picks
/// donor or patient. `Admin` and `SubAdmin` are only ever assigned out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SubAdmin,
    Donor,
    Patient,
    #[default]
    Unset,
}

impl Role {
    /// Database representation (`None` for `Unset`)
    pub fn as_db(self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("admin"),
            Self::SubAdmin => Some("sub_admin"),
            Self::Donor => Some("donor"),
            Self::Patient => Some("patient"),
            Self::Unset => None,
        }
    }

    /// Parse the database representation; unknown values map to `Unset`
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            Some("sub_admin") => Self::SubAdmin,
            Some("donor") => Self::Donor,
            Some("patient") => Self::Patient,
            _ => Self::Unset,
        }
    }

    /// Admin or sub-admin
    #[inline]
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::SubAdmin)
    }

    /// Roles a user may pick for themselves
    #[inline]
    pub fn is_self_selectable(self) -> bool {
        matches!(self, Self::Donor | Self::Patient)
    }

    /// The opposite member-facing role, used by role switching
    pub fn switched(self) -> Option<Self> {
        match self {
            Self::Donor => Some(Self::Patient),
            Self::Patient => Some(Self::Donor),
            Self::Admin | Self::SubAdmin | Self::Unset => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db().unwrap_or("unset"))
    }
}
