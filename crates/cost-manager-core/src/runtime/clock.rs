// crates/cost-manager-core/src/runtime/clock.rs
// ============================================================================
// Module: Cost Manager Clocks
// Description: System and fixed implementations of the clock interface.
// Purpose: Supply "today" for date defaulting without hidden wall-clock reads.
// Dependencies: crate::interfaces, time
// ============================================================================

//! ## Overview
//! [`SystemClock`] reads local time, falling back to UTC when the local
//! offset cannot be determined. [`FixedClock`] always returns the same date
//! and is used by tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use time::Date;
use time::OffsetDateTime;

use crate::interfaces::Clock;

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Wall-clock date source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()).date()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// Date returned by every call.
    date: Date,
}

impl FixedClock {
    /// Creates a clock that always reports `date`.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self {
            date,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.date
    }
}

/// Shared clock backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedClock {
    /// Inner clock implementation.
    inner: Arc<dyn Clock + Send + Sync>,
}

impl SharedClock {
    /// Wraps a clock in a shared, clonable wrapper.
    #[must_use]
    pub fn from_clock(clock: impl Clock + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(clock),
        }
    }
}

impl Clock for SharedClock {
    fn today(&self) -> Date {
        self.inner.today()
    }
}
