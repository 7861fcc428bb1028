// crates/cost-manager-core/src/core/cost.rs
// ============================================================================
// Module: Cost Manager Cost Records
// Description: Normalized cost record and its calendar date.
// Purpose: Define the stored and serialized shape of a cost entry.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A [`CostRecord`] is the normalized, immutable form of an accepted cost.
//! Its date is split into day, month, and year fields on the wire; the
//! [`CostDate`] constructor guarantees the triple is a real Gregorian date.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use time::Date;
use time::Month;

use crate::core::Amount;
use crate::core::Category;
use crate::core::UserId;

// ============================================================================
// SECTION: Cost Date
// ============================================================================

/// Calendar date of a cost.
///
/// # Invariants
/// - Always a valid Gregorian date (leap years respected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CostDate(Date);

impl CostDate {
    /// Builds a date from raw components, returning `None` when the triple is
    /// not a real calendar date.
    #[must_use]
    pub fn from_parts(year: i64, month: i64, day: i64) -> Option<Self> {
        let year = i32::try_from(year).ok()?;
        let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
        let day = u8::try_from(day).ok()?;
        Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Wraps an existing date.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Returns the day of month (1-31).
    #[must_use]
    pub const fn day(self) -> u8 {
        self.0.day()
    }

    /// Returns the month (1-12).
    #[must_use]
    pub fn month(self) -> u8 {
        u8::from(self.0.month())
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the wrapped date.
    #[must_use]
    pub const fn as_date(self) -> Date {
        self.0
    }
}

// ============================================================================
// SECTION: Cost Record
// ============================================================================

/// Normalized cost record.
///
/// # Invariants
/// - `description` is trimmed and non-empty.
/// - `date` is a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostRecord {
    /// Free-text description.
    pub description: String,
    /// Cost category.
    pub category: Category,
    /// Owning user.
    pub userid: UserId,
    /// Cost amount.
    pub sum: Amount,
    /// Date the cost was incurred.
    pub date: CostDate,
}

/// Wire form of a cost record.
#[derive(Serialize)]
struct CostRecordWire<'a> {
    /// Free-text description.
    description: &'a str,
    /// Lowercase category label.
    category: Category,
    /// Owning user.
    userid: UserId,
    /// Cost amount.
    sum: &'a Amount,
    /// Day of month.
    day: u8,
    /// Month of year.
    month: u8,
    /// Calendar year.
    year: i32,
}

impl Serialize for CostRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CostRecordWire {
            description: &self.description,
            category: self.category,
            userid: self.userid,
            sum: &self.sum,
            day: self.date.day(),
            month: self.date.month(),
            year: self.date.year(),
        }
        .serialize(serializer)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
