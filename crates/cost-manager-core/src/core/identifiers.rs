// crates/cost-manager-core/src/core/identifiers.rs
// ============================================================================
// Module: Cost Manager Identifiers
// Description: Strongly typed user identifier.
// Purpose: Keep user ids non-negative and storable as signed 64-bit integers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! User identifiers arrive as JSON numbers, digit-only strings, query
//! parameters, or path segments. Once parsed they are carried as [`UserId`],
//! which serializes as a plain JSON number.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// User identifier shared by cost records and user records.
///
/// # Invariants
/// - Always >= 0.
/// - Always fits in a signed 64-bit integer so it can be stored as `INTEGER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a raw value (returns `None` if negative).
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        if raw < 0 { None } else { Some(Self(raw)) }
    }

    /// Parses a digit-only string into a user identifier.
    ///
    /// Returns `None` for empty input, any non-digit character (including
    /// signs and whitespace), or values outside the signed 64-bit range.
    #[must_use]
    pub fn parse_digits(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        raw.parse::<i64>().ok().and_then(Self::from_raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_raw(value).ok_or_else(|| format!("user id must be non-negative: {value}"))
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
