// crates/cost-manager-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cost Manager Interfaces
// Description: Backend-agnostic persistence and clock interfaces.
// Purpose: Keep the core free of storage engines and wall-clock reads.
// Dependencies: thiserror, time
// ============================================================================

//! ## Overview
//! The core reaches persistence through [`CostStore`] and the current date
//! through [`Clock`]. Hosts inject concrete implementations; tests use the
//! in-memory store and a fixed clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use time::Date;

use crate::core::CostRecord;
use crate::core::UserId;
use crate::core::UserRecord;

// ============================================================================
// SECTION: Cost Store
// ============================================================================

/// Cost store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("cost store io error: {0}")]
    Io(String),
    /// Stored data is corrupted or cannot be decoded.
    #[error("cost store corruption: {0}")]
    Corrupt(String),
    /// Store data is invalid.
    #[error("cost store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("cost store error: {0}")]
    Store(String),
}

/// Persistent store for cost and user records.
///
/// # Invariants
/// - A cost accepted by [`CostStore::insert_cost`] is visible to every later
///   query on the same store.
/// - Queries return costs in insertion order.
pub trait CostStore {
    /// Persists a new cost record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be saved.
    fn insert_cost(&self, cost: &CostRecord) -> Result<(), StoreError>;

    /// Returns the costs of a user for one month of one year.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn costs_for_month(
        &self,
        userid: UserId,
        year: i32,
        month: u8,
    ) -> Result<Vec<CostRecord>, StoreError>;

    /// Returns every cost of a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn costs_for_user(&self, userid: UserId) -> Result<Vec<CostRecord>, StoreError>;

    /// Inserts or replaces a user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be saved.
    fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn find_user(&self, userid: UserId) -> Result<Option<UserRecord>, StoreError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of the current calendar date.
pub trait Clock {
    /// Returns today's date in the host's notion of local time.
    fn today(&self) -> Date;
}
