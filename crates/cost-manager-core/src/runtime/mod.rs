// crates/cost-manager-core/src/runtime/mod.rs
// ============================================================================
// Module: Cost Manager Runtime
// Description: Service facade, report aggregation, clocks, and in-memory store.
// Purpose: Execute cost operations over injected store and clock interfaces.
// Dependencies: crate::{core, interfaces, validation}
// ============================================================================

//! ## Overview
//! The runtime wires validation, the clock, and the store together behind
//! [`CostService`]. Report aggregation is a pure function so it can be tested
//! without a store; the user summary follows the same shape.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod clock;
pub mod report;
pub mod service;
pub mod store;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::FixedClock;
pub use clock::SharedClock;
pub use clock::SystemClock;
pub use report::build_monthly_report;
pub use service::CostService;
pub use service::NotFoundError;
pub use service::ServiceError;
pub use store::InMemoryCostStore;
pub use store::SharedCostStore;
pub use summary::build_user_summary;
