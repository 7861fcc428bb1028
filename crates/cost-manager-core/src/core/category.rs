// crates/cost-manager-core/src/core/category.rs
// ============================================================================
// Module: Cost Manager Categories
// Description: Closed set of cost categories.
// Purpose: Normalize raw category strings once at the input boundary.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Costs belong to exactly one of five fixed categories. Input matching is
//! case-insensitive; the canonical (stored and serialized) form is lowercase.
//! [`Category::ALL`] fixes the order used by monthly reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Category
// ============================================================================

/// Cost category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Groceries, restaurants, and other food spending.
    Food,
    /// Medical and wellness spending.
    Health,
    /// Rent, mortgage, and household spending.
    Housing,
    /// Sport and fitness spending.
    Sport,
    /// Tuition, courses, and learning materials.
    Education,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Self; 5] =
        [Self::Food, Self::Health, Self::Housing, Self::Sport, Self::Education];

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Health => "health",
            Self::Housing => "housing",
            Self::Sport => "sport",
            Self::Education => "education",
        }
    }

    /// Parses a category label, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str().eq_ignore_ascii_case(raw))
    }

    /// Returns the comma-separated list of allowed labels.
    #[must_use]
    pub fn allowed_labels() -> String {
        Self::ALL.iter().map(|category| category.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
