// crates/cost-manager-core/src/core/mod.rs
// ============================================================================
// Module: Cost Manager Core Types
// Description: Canonical cost, user, and report structures.
// Purpose: Provide stable, serializable types for the Cost Manager JSON contract.
// Dependencies: bigdecimal, serde, time
// ============================================================================

//! ## Overview
//! Cost Manager core types define cost records, users, and the monthly report
//! projection. These types are the canonical source of truth for the HTTP
//! surface; their serialized field names are part of the wire contract.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod amount;
pub mod category;
pub mod cost;
pub mod identifiers;
pub mod report;
pub mod user;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use amount::Amount;
pub use amount::AmountParseError;
pub use category::Category;
pub use cost::CostDate;
pub use cost::CostRecord;
pub use identifiers::UserId;
pub use report::CategoryBucket;
pub use report::MonthlyReport;
pub use report::ReportItem;
pub use report::UserSummary;
pub use user::MaritalStatus;
pub use user::UserRecord;
