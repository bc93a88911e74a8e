//! Roles and the central capability policy.
//!
//! Every permission decision goes through [`Role::allows`] — handlers never
//! compare role values directly, so the whole policy lives in one table.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Wire format: `u8` (0 = Student, 1 = Teacher, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student = 0,
    Teacher = 1,
    Admin = 2,
}

/// Things a caller can be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Enroll in courses and redeem coupons.
    Enroll,
    /// Record lesson completion for oneself.
    TrackProgress,
    /// Create withdrawal requests for one's own teacher profile.
    RequestPayout,
    /// Approve, reject, or complete payout requests.
    ReviewPayouts,
    /// Publish or unpublish courses.
    ModerateCourses,
}

impl Role {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Student),
            1 => Some(Self::Teacher),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The single permission table. Teachers can also take courses as
    /// students; admins moderate but do not enroll or request payouts.
    pub fn allows(self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Self::Student => matches!(capability, Enroll | TrackProgress),
            Self::Teacher => matches!(capability, Enroll | TrackProgress | RequestPayout),
            Self::Admin => matches!(capability, ReviewPayouts | ModerateCourses),
        }
    }
}
