// crates/cost-manager-core/src/runtime/summary.rs
// ============================================================================
// Module: Cost Manager User Summary
// Description: Totals a user's costs across all dates.
// Purpose: Build the user summary projection served by user lookups.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The total is an exact decimal sum, so it matches the sum of the stored
//! amounts digit for digit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Amount;
use crate::core::CostRecord;
use crate::core::UserRecord;
use crate::core::UserSummary;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Builds the summary for `user` from its cost records.
///
/// Records owned by other users are ignored.
#[must_use]
pub fn build_user_summary(user: &UserRecord, costs: &[CostRecord]) -> UserSummary {
    let total: Amount =
        costs.iter().filter(|cost| cost.userid == user.id).map(|cost| &cost.sum).sum();
    UserSummary {
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        id: user.id,
        total,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Test-only assertions on known-good fixtures.")]

    use serde_json::json;

    use super::build_user_summary;
    use crate::core::Category;
    use crate::core::CostDate;
    use crate::core::CostRecord;
    use crate::core::UserId;
    use crate::core::UserRecord;

    fn user() -> UserRecord {
        UserRecord {
            id: UserId::from_raw(123_123).expect("id"),
            first_name: "mosh".to_string(),
            last_name: "israeli".to_string(),
            birthday: None,
            marital_status: None,
        }
    }

    fn cost(userid: i64, sum: &str) -> CostRecord {
        CostRecord {
            description: "item".to_string(),
            category: Category::Housing,
            userid: UserId::from_raw(userid).expect("id"),
            sum: sum.parse().expect("sum"),
            date: CostDate::from_parts(2024, 1, 1).expect("date"),
        }
    }

    #[test]
    fn user_without_costs_has_zero_total() {
        let summary = build_user_summary(&user(), &[]);
        assert_eq!(
            serde_json::to_value(&summary).expect("serialize"),
            json!({"first_name": "mosh", "last_name": "israeli", "id": 123_123, "total": 0})
        );
    }

    #[test]
    fn total_is_exact_and_ignores_other_users() {
        let costs = [cost(123_123, "0.1"), cost(123_123, "0.2"), cost(1, "1000")];
        let summary = build_user_summary(&user(), &costs);
        assert_eq!(summary.total, "0.3".parse().expect("amount"));
    }
}
