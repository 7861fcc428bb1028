// crates/cost-manager-core/src/runtime/store.rs
// ============================================================================
// Module: Cost Manager In-Memory Store
// Description: Simple in-memory cost store for tests and local runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`CostStore`]
//! for tests and local demos, plus [`SharedCostStore`], the clonable wrapper
//! hosts pass around. Data is lost when the process exits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::CostRecord;
use crate::core::UserId;
use crate::core::UserRecord;
use crate::interfaces::CostStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable contents of the in-memory store.
#[derive(Debug, Default)]
struct InMemoryState {
    /// Costs in insertion order.
    costs: Vec<CostRecord>,
    /// Users keyed by id.
    users: BTreeMap<UserId, UserRecord>,
}

/// In-memory cost store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCostStore {
    /// Store contents protected by a mutex.
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryCostStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the store contents.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("cost store mutex poisoned".to_string()))
    }
}

impl CostStore for InMemoryCostStore {
    fn insert_cost(&self, cost: &CostRecord) -> Result<(), StoreError> {
        self.lock()?.costs.push(cost.clone());
        Ok(())
    }

    fn costs_for_month(
        &self,
        userid: UserId,
        year: i32,
        month: u8,
    ) -> Result<Vec<CostRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .costs
            .iter()
            .filter(|cost| {
                cost.userid == userid && cost.date.year() == year && cost.date.month() == month
            })
            .cloned()
            .collect())
    }

    fn costs_for_user(&self, userid: UserId) -> Result<Vec<CostRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.costs.iter().filter(|cost| cost.userid == userid).cloned().collect())
    }

    fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        self.lock()?.users.insert(user.id, user.clone());
        Ok(())
    }

    fn find_user(&self, userid: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock()?.users.get(&userid).cloned())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared cost store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedCostStore {
    /// Inner store implementation.
    inner: Arc<dyn CostStore + Send + Sync>,
}

impl SharedCostStore {
    /// Wraps a cost store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl CostStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn CostStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl CostStore for SharedCostStore {
    fn insert_cost(&self, cost: &CostRecord) -> Result<(), StoreError> {
        self.inner.insert_cost(cost)
    }

    fn costs_for_month(
        &self,
        userid: UserId,
        year: i32,
        month: u8,
    ) -> Result<Vec<CostRecord>, StoreError> {
        self.inner.costs_for_month(userid, year, month)
    }

    fn costs_for_user(&self, userid: UserId) -> Result<Vec<CostRecord>, StoreError> {
        self.inner.costs_for_user(userid)
    }

    fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        self.inner.upsert_user(user)
    }

    fn find_user(&self, userid: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.inner.find_user(userid)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Test-only assertions use expect for clarity.")]

    use std::thread;

    use super::InMemoryCostStore;
    use super::SharedCostStore;
    use crate::core::Category;
    use crate::core::CostDate;
    use crate::core::CostRecord;
    use crate::core::UserId;
    use crate::interfaces::CostStore;

    fn cost(userid: i64, month: i64, sum: i64) -> CostRecord {
        CostRecord {
            description: format!("item {sum}"),
            category: Category::Food,
            userid: UserId::from_raw(userid).expect("userid"),
            sum: sum.into(),
            date: CostDate::from_parts(2025, month, 1).expect("date"),
        }
    }

    #[test]
    fn queries_keep_insertion_order_and_filter_exactly() {
        let store = InMemoryCostStore::new();
        for (userid, month, sum) in [(1, 2, 3), (1, 2, 1), (2, 2, 9), (1, 3, 4)] {
            store.insert_cost(&cost(userid, month, sum)).expect("insert");
        }
        let userid = UserId::from_raw(1).expect("userid");
        let february = store.costs_for_month(userid, 2025, 2).expect("query");
        assert_eq!(february, vec![cost(1, 2, 3), cost(1, 2, 1)]);
        assert_eq!(store.costs_for_user(userid).expect("query").len(), 3);
        assert!(store.costs_for_month(userid, 2024, 2).expect("query").is_empty());
    }

    #[test]
    fn shared_handles_see_each_others_writes() {
        let store = SharedCostStore::from_store(InMemoryCostStore::new());
        let handles: Vec<_> = (0 .. 4)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || store.insert_cost(&cost(5, 1, worker)).expect("insert"))
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }
        let userid = UserId::from_raw(5).expect("userid");
        assert_eq!(store.costs_for_user(userid).expect("query").len(), 4);
    }
}
