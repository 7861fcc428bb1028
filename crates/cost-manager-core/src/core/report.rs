// crates/cost-manager-core/src/core/report.rs
// ============================================================================
// Module: Cost Manager Reports
// Description: Monthly report and user summary projections.
// Purpose: Fix the JSON shape of read-only cost projections.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`MonthlyReport`] lists a user's costs for one month bucketed by
//! category. Buckets serialize as single-key objects (`{"food": [...]}`) and
//! always appear in [`Category::ALL`] order, even when empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::core::Amount;
use crate::core::Category;
use crate::core::UserId;

// ============================================================================
// SECTION: Monthly Report
// ============================================================================

/// Single cost line inside a report bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    /// Cost amount.
    pub sum: Amount,
    /// Free-text description.
    pub description: String,
    /// Day of month.
    pub day: u8,
}

/// Costs of one category inside a monthly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    /// Bucket category.
    pub category: Category,
    /// Items in store order.
    pub items: Vec<ReportItem>,
}

impl Serialize for CategoryBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.category.as_str(), &self.items)?;
        map.end()
    }
}

/// Per-user, per-month cost report.
///
/// # Invariants
/// - `costs` holds exactly one bucket per category, in [`Category::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    /// Reported user.
    pub userid: UserId,
    /// Reported year.
    pub year: i32,
    /// Reported month (1-12).
    pub month: u8,
    /// Category buckets.
    pub costs: Vec<CategoryBucket>,
}

// ============================================================================
// SECTION: User Summary
// ============================================================================

/// User details with the total of all their costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// User identifier.
    pub id: UserId,
    /// Total of every cost recorded for the user.
    pub total: Amount,
}
