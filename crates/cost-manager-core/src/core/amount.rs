// crates/cost-manager-core/src/core/amount.rs
// ============================================================================
// Module: Cost Manager Amounts
// Description: Exact decimal amounts for cost sums and totals.
// Purpose: Keep sums exact in storage and aggregation while rendering JSON numbers.
// Dependencies: bigdecimal, serde, serde_json
// ============================================================================

//! ## Overview
//! Cost sums are held as [`BigDecimal`] so totals never accumulate binary
//! floating-point error. Amounts serialize as JSON numbers: integral values
//! as integers, fractional values as the nearest `f64`. Parsed amounts are
//! bounded to the `f64` range; only aggregated totals that overflow it fall
//! back to their exact decimal string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use serde::Serialize;
use serde::Serializer;
use serde_json::Number;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum count of integral digits accepted when parsing (`f64::MAX` has 309).
const MAX_INTEGRAL_DIGITS: i64 = 309;
/// Maximum count of fractional digits accepted when parsing.
const MAX_FRACTIONAL_DIGITS: i64 = 340;

// ============================================================================
// SECTION: Amount
// ============================================================================

/// Exact decimal amount.
///
/// # Invariants
/// - Always finite (`BigDecimal` has no NaN or infinity).
/// - Parsed amounts fit in an `f64`; negative, zero, and sub-unit values
///   are valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigDecimal);

/// Amount parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("amount is not a finite decimal: {0}")]
pub struct AmountParseError(pub String);

impl Amount {
    /// Returns the zero amount.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::from(0_i64))
    }

    /// Wraps an existing decimal value.
    #[must_use]
    pub const fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    /// Converts a JSON number into an exact amount.
    ///
    /// # Errors
    ///
    /// Returns [`AmountParseError`] when the rendered number cannot be parsed.
    pub fn from_json_number(number: &Number) -> Result<Self, AmountParseError> {
        number.to_string().parse()
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Returns the canonical decimal text used for storage.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        self.0.normalized().to_string()
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError(raw.to_string()));
        }
        let value =
            BigDecimal::from_str(trimmed).map_err(|_| AmountParseError(raw.to_string()))?;
        if !within_f64_range(&value) {
            return Err(AmountParseError(raw.to_string()));
        }
        Ok(Self(value))
    }
}

/// Returns true when `value` has a bounded scale and a finite `f64` image.
///
/// The digit and scale checks run first so that exponent forms such as
/// `1e10000000` are rejected without expanding them.
fn within_f64_range(value: &BigDecimal) -> bool {
    let (_, scale) = value.as_bigint_and_exponent();
    let digits = i64::try_from(value.digits()).unwrap_or(i64::MAX);
    if scale > MAX_FRACTIONAL_DIGITS || digits.saturating_sub(scale) > MAX_INTEGRAL_DIGITS {
        return false;
    }
    value.to_f64().is_some_and(f64::is_finite)
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, amount| Self(acc.0 + amount.0))
    }
}

impl<'a> Sum<&'a Self> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, amount| Self(acc.0 + &amount.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_integer()
            && let Some(value) = self.0.to_i64()
        {
            return serializer.serialize_i64(value);
        }
        match self.0.to_f64() {
            Some(value) if value.is_finite() => serializer.serialize_f64(value),
            _ => serializer.serialize_str(&self.to_canonical_string()),
        }
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
        reason = "Test-only assertions on known-good literals."
    )]

    use serde_json::json;

    use super::Amount;

    #[test]
    fn integral_amounts_serialize_as_integers() {
        let amount: Amount = "20".parse().expect("amount");
        assert_eq!(serde_json::to_value(&amount).expect("serialize"), json!(20));
    }

    #[test]
    fn fractional_amounts_serialize_as_floats() {
        let amount: Amount = "0.10".parse().expect("amount");
        assert_eq!(serde_json::to_value(&amount).expect("serialize"), json!(0.1));
    }

    #[test]
    fn sums_are_exact() {
        let parts: Vec<Amount> =
            ["0.1", "0.2", "-0.3"].iter().map(|raw| raw.parse().expect("amount")).collect();
        let total: Amount = parts.iter().sum();
        assert_eq!(total, Amount::zero());
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!("abc".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
        assert!("NaN".parse::<Amount>().is_err());
    }

    #[test]
    fn rejects_values_outside_f64_range() {
        for raw in ["1e400", "-1e400", "1e10000000", "1e-10000000", "2e308"] {
            assert!(raw.parse::<Amount>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn accepts_large_values_inside_f64_range() {
        let amount: Amount = "1.7e308".parse().expect("amount");
        assert!(serde_json::to_value(&amount).expect("serialize").is_number());
        let tiny: Amount = "5e-300".parse().expect("amount");
        assert!(serde_json::to_value(&tiny).expect("serialize").is_number());
    }
}
