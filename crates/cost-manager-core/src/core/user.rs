// crates/cost-manager-core/src/core/user.rs
// ============================================================================
// Module: Cost Manager Users
// Description: User records referenced by cost entries.
// Purpose: Describe the users that summaries are computed for.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Users are seeded by the host (from configuration) and looked up by id when
//! building user summaries. Costs reference users by [`UserId`] only; adding
//! a cost never requires the user to exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;

use crate::core::UserId;

// ============================================================================
// SECTION: User Types
// ============================================================================

/// Marital status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Never married.
    Single,
    /// Currently married.
    Married,
    /// Divorced.
    Divorced,
    /// Widowed.
    Widowed,
}

impl MaritalStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
        }
    }

    /// Parses a canonical label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "single" => Some(Self::Single),
            "married" => Some(Self::Married),
            "divorced" => Some(Self::Divorced),
            "widowed" => Some(Self::Widowed),
            _ => None,
        }
    }
}

/// User record.
///
/// # Invariants
/// - `first_name` and `last_name` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional date of birth.
    pub birthday: Option<Date>,
    /// Optional marital status.
    pub marital_status: Option<MaritalStatus>,
}
