// crates/cost-manager-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Cost Store
// Description: Durable CostStore backend using SQLite WAL.
// Purpose: Provide persistent storage for cost and user records.
// Dependencies: cost-manager-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`CostStore`] implementation. Costs
//! are appended to a single table indexed by user and period; sums are kept
//! as exact decimal text. Rows are decoded fail-closed: anything that does
//! not parse back into a valid record is reported as corruption.
//!
//! [`CostStore`]: cost_manager_core::CostStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteCostStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
