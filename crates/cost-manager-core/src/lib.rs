// crates/cost-manager-core/src/lib.rs
// ============================================================================
// Module: Cost Manager Core Library
// Description: Public API surface for the Cost Manager core.
// Purpose: Expose cost types, store interfaces, validation, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime, validation}
// ============================================================================

//! ## Overview
//! Cost Manager core owns the cost record model, the input validation rules
//! for cost creation and report queries, and the monthly report aggregation.
//! Persistence and wall-clock time are reached only through the
//! [`CostStore`] and [`Clock`] interfaces so hosts can inject durable or
//! in-memory implementations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::Clock;
pub use interfaces::CostStore;
pub use interfaces::StoreError;
pub use runtime::CostService;
pub use runtime::FixedClock;
pub use runtime::InMemoryCostStore;
pub use runtime::NotFoundError;
pub use runtime::ServiceError;
pub use runtime::SharedClock;
pub use runtime::SharedCostStore;
pub use runtime::SystemClock;
pub use runtime::build_monthly_report;
pub use runtime::build_user_summary;
pub use validation::CostInput;
pub use validation::ReportQuery;
pub use validation::ReportRequest;
pub use validation::ValidationError;
