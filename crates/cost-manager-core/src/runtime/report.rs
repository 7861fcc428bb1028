// crates/cost-manager-core/src/runtime/report.rs
// ============================================================================
// Module: Cost Manager Report Aggregation
// Description: Buckets a month of costs into the fixed category list.
// Purpose: Build the monthly report projection from raw cost records.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`build_monthly_report`] is pure: it receives the already-filtered costs
//! for one user and month and groups them into one bucket per category.
//! Records for other users or months are skipped, so callers may pass a
//! superset without corrupting the report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CategoryBucket;
use crate::core::Category;
use crate::core::CostRecord;
use crate::core::MonthlyReport;
use crate::core::ReportItem;
use crate::core::UserId;

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Groups a user's costs for one month into the five category buckets.
#[must_use]
pub fn build_monthly_report(
    userid: UserId,
    year: i32,
    month: u8,
    costs: &[CostRecord],
) -> MonthlyReport {
    let in_period = |cost: &&CostRecord| {
        cost.userid == userid && cost.date.year() == year && cost.date.month() == month
    };
    let costs = Category::ALL
        .into_iter()
        .map(|category| CategoryBucket {
            category,
            items: costs
                .iter()
                .filter(in_period)
                .filter(|cost| cost.category == category)
                .map(|cost| ReportItem {
                    sum: cost.sum.clone(),
                    description: cost.description.clone(),
                    day: cost.date.day(),
                })
                .collect(),
        })
        .collect();
    MonthlyReport {
        userid,
        year,
        month,
        costs,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
