// crates/cost-manager-core/src/runtime/service.rs
// ============================================================================
// Module: Cost Manager Service
// Description: Operation facade over validation, clock, and store.
// Purpose: Execute add, report, and user lookup operations for any host.
// Dependencies: thiserror, crate::{core, interfaces, runtime, validation}
// ============================================================================

//! ## Overview
//! [`CostService`] is the only entry point hosts use to run cost operations.
//! Each operation validates its raw input, touches the store at most twice,
//! and returns a typed projection. Errors are folded into [`ServiceError`] so
//! a transport maps them to status codes at a single seam.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CostRecord;
use crate::core::MonthlyReport;
use crate::core::UserRecord;
use crate::core::UserSummary;
use crate::interfaces::CostStore;
use crate::interfaces::StoreError;
use crate::runtime::SharedClock;
use crate::runtime::SharedCostStore;
use crate::runtime::build_monthly_report;
use crate::runtime::build_user_summary;
use crate::validation::CostInput;
use crate::validation::ReportQuery;
use crate::validation::ValidationError;
use crate::validation::validate_new_cost;
use crate::validation::validate_report_query;
use crate::validation::validate_user_segment;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rejection text for an unknown user.
pub const USER_NOT_FOUND: &str = "User not found";

/// Referenced entity does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NotFoundError {
    /// Human-readable message returned to the client.
    message: String,
}

impl NotFoundError {
    /// Creates a not-found error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Cost service errors.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Client input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Referenced entity does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// Store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Cost operation facade.
#[derive(Clone)]
pub struct CostService {
    /// Backing store.
    store: SharedCostStore,
    /// Source of "today" for date defaults.
    clock: SharedClock,
}

impl CostService {
    /// Creates a service over the given store and clock.
    #[must_use]
    pub const fn new(store: SharedCostStore, clock: SharedClock) -> Self {
        Self {
            store,
            clock,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &SharedCostStore {
        &self.store
    }

    /// Validates and persists a new cost.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for rejected input and
    /// [`ServiceError::Store`] when persisting fails.
    pub fn add_cost(&self, input: &CostInput) -> Result<CostRecord, ServiceError> {
        let cost = validate_new_cost(input, &self.clock)?;
        self.store.insert_cost(&cost)?;
        Ok(cost)
    }

    /// Builds the monthly report for a query.
    ///
    /// Unknown users and empty months produce a report with empty buckets.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for rejected queries and
    /// [`ServiceError::Store`] when loading fails.
    pub fn monthly_report(&self, query: &ReportQuery) -> Result<MonthlyReport, ServiceError> {
        let request = validate_report_query(query)?;
        let costs = self.store.costs_for_month(request.userid, request.year, request.month)?;
        Ok(build_monthly_report(request.userid, request.year, request.month, &costs))
    }

    /// Resolves a user by path segment and totals their costs.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty or non-numeric
    /// segment, [`ServiceError::NotFound`] for an unknown user, and
    /// [`ServiceError::Store`] when loading fails.
    pub fn user_summary(&self, segment: Option<&str>) -> Result<UserSummary, ServiceError> {
        let userid = validate_user_segment(segment)?;
        let user = self.store.find_user(userid)?.ok_or_else(|| NotFoundError::new(USER_NOT_FOUND))?;
        let costs = self.store.costs_for_user(userid)?;
        Ok(build_user_summary(&user, &costs))
    }

    /// Upserts every user record into the store.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] on the first failing upsert.
    pub fn seed_users(&self, users: &[UserRecord]) -> Result<(), ServiceError> {
        for user in users {
            self.store.upsert_user(user)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use serde_json::json;
    use time::macros::date;

    use super::CostService;
    use super::ServiceError;
    use super::USER_NOT_FOUND;
    use crate::core::UserId;
    use crate::core::UserRecord;
    use crate::interfaces::CostStore;
    use crate::interfaces::StoreError;
    use crate::runtime::FixedClock;
    use crate::runtime::InMemoryCostStore;
    use crate::runtime::SharedClock;
    use crate::runtime::SharedCostStore;
    use crate::validation::CostInput;
    use crate::validation::ReportQuery;

    fn service() -> CostService {
        CostService::new(
            SharedCostStore::from_store(InMemoryCostStore::new()),
            SharedClock::from_clock(FixedClock::new(date!(2025 - 02 - 10))),
        )
    }

    fn input(value: serde_json::Value) -> CostInput {
        serde_json::from_value(value).expect("input")
    }

    fn query(id: &str, year: &str, month: &str) -> ReportQuery {
        ReportQuery {
            id: Some(id.to_string()),
            year: Some(year.to_string()),
            month: Some(month.to_string()),
        }
    }

    #[test]
    fn added_cost_appears_in_its_monthly_report() {
        let service = service();
        service
            .add_cost(&input(json!({
                "description": "Milk 9", "category": "food", "userid": 123_123, "sum": 8
            })))
            .expect("add");
        let report = service.monthly_report(&query("123123", "2025", "2")).expect("report");
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(
            value["costs"][0],
            json!({"food": [{"sum": 8, "description": "Milk 9", "day": 10}]})
        );
    }

    #[test]
    fn rejected_cost_is_not_stored() {
        let service = service();
        let err = service
            .add_cost(&input(json!({"category": "food", "userid": 1, "sum": 1})))
            .expect_err("missing description");
        assert!(matches!(err, ServiceError::Validation(_)));
        let costs = service.store().costs_for_user(UserId::from_raw(1).expect("id")).expect("load");
        assert!(costs.is_empty());
    }

    #[test]
    fn unknown_user_summary_is_not_found() {
        let err = service().user_summary(Some("999999")).expect_err("unknown user");
        match err {
            ServiceError::NotFound(inner) => assert_eq!(inner.message(), USER_NOT_FOUND),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn seeded_user_summary_totals_all_costs() {
        let service = service();
        service
            .seed_users(&[UserRecord {
                id: UserId::from_raw(123_123).expect("id"),
                first_name: "mosh".to_string(),
                last_name: "israeli".to_string(),
                birthday: None,
                marital_status: None,
            }])
            .expect("seed");
        for (sum, year) in [("12.5", 2024), ("7.5", 2025)] {
            service
                .add_cost(&input(json!({
                    "description": "x", "category": "health", "userid": "123123",
                    "sum": sum, "year": year
                })))
                .expect("add");
        }
        let summary = service.user_summary(Some("123123")).expect("summary");
        assert_eq!(
            serde_json::to_value(&summary).expect("serialize"),
            json!({"first_name": "mosh", "last_name": "israeli", "id": 123_123, "total": 20})
        );
    }

    struct FailingStore;

    impl CostStore for FailingStore {
        fn insert_cost(&self, _cost: &crate::core::CostRecord) -> Result<(), StoreError> {
            Err(StoreError::Io("disk full".to_string()))
        }

        fn costs_for_month(
            &self,
            _userid: UserId,
            _year: i32,
            _month: u8,
        ) -> Result<Vec<crate::core::CostRecord>, StoreError> {
            Err(StoreError::Io("disk gone".to_string()))
        }

        fn costs_for_user(
            &self,
            _userid: UserId,
        ) -> Result<Vec<crate::core::CostRecord>, StoreError> {
            Err(StoreError::Io("disk gone".to_string()))
        }

        fn upsert_user(&self, _user: &UserRecord) -> Result<(), StoreError> {
            Err(StoreError::Io("disk full".to_string()))
        }

        fn find_user(&self, _userid: UserId) -> Result<Option<UserRecord>, StoreError> {
            Err(StoreError::Io("disk gone".to_string()))
        }
    }

    #[test]
    fn store_failures_surface_as_store_errors() {
        let service = CostService::new(
            SharedCostStore::from_store(FailingStore),
            SharedClock::from_clock(FixedClock::new(date!(2025 - 02 - 10))),
        );
        let err = service.monthly_report(&query("1", "2025", "2")).expect_err("store failure");
        assert!(matches!(err, ServiceError::Store(StoreError::Io(_))));
        let err = service.user_summary(Some("abc")).expect_err("validation first");
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
