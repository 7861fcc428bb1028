// crates/cost-manager-core/src/validation/mod.rs
// ============================================================================
// Module: Cost Manager Validation
// Description: Normalization and validation of untrusted request input.
// Purpose: Turn raw JSON payloads and query strings into typed requests.
// Dependencies: serde, serde_json, thiserror, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Every value that reaches the store passes through this module first.
//! Checks run in a fixed order and the first failure wins, so clients always
//! see the same message for the same payload:
//!
//! 1. required fields present (absent, `null`, and blank strings count as
//!    missing),
//! 2. `userid` is a non-negative integer or digit-only string,
//! 3. `category` is one of the five labels (ASCII case-insensitive),
//! 4. `sum` is a finite decimal number or numeric string,
//! 5. `day`/`month`/`year` default independently from the clock and must
//!    form a real calendar date.
//!
//! The error texts are part of the HTTP contract and are exposed as
//! constants so hosts and tests can match them exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::Amount;
use crate::core::Category;
use crate::core::CostDate;
use crate::core::CostRecord;
use crate::core::UserId;
use crate::interfaces::Clock;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Rejection text when a required field or parameter is missing.
pub const MISSING_PARAMETERS: &str = "One or more required parameters are missing";
/// Rejection text for a malformed user id.
pub const USERID_NOT_NUMBER: &str = "Userid must be a number";
/// Rejection text for a non-numeric sum.
pub const SUM_NOT_NUMBER: &str = "Sum must be a number";
/// Rejection text for a non-string description.
pub const DESCRIPTION_NOT_STRING: &str = "Description must be a string";
/// Rejection text for an impossible calendar date.
pub const INVALID_DATE: &str = "Invalid date";
/// Rejection text for non-numeric report parameters.
pub const REPORT_PARAMS_NOT_NUMBER: &str = "id, month and year must be a number";
/// Rejection text for a month outside 1-12.
pub const MONTH_OUT_OF_RANGE: &str = "Month parameter is out of valid range (1-12)";
/// Rejection text for an empty user id path segment.
pub const USERID_REQUIRED: &str = "Userid is required";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client input rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable rejection reason returned to the client.
    message: String,
}

impl ValidationError {
    /// Creates a validation error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the rejection message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rejection for an invalid category.
    #[must_use]
    pub fn invalid_category() -> Self {
        Self::new(format!(
            "Invalid category. Allowed categories are: {}",
            Category::allowed_labels()
        ))
    }
}

// ============================================================================
// SECTION: Inputs
// ============================================================================

/// Raw cost-creation payload as decoded from the request body.
///
/// Fields stay untyped so that type mismatches surface as the ordered
/// validation messages instead of generic decode failures. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostInput {
    /// Free-text description.
    #[serde(default)]
    pub description: Option<Value>,
    /// Category label.
    #[serde(default)]
    pub category: Option<Value>,
    /// Owning user id.
    #[serde(default)]
    pub userid: Option<Value>,
    /// Cost amount.
    #[serde(default)]
    pub sum: Option<Value>,
    /// Optional day of month.
    #[serde(default)]
    pub day: Option<Value>,
    /// Optional month.
    #[serde(default)]
    pub month: Option<Value>,
    /// Optional year.
    #[serde(default)]
    pub year: Option<Value>,
}

/// Raw monthly report query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportQuery {
    /// User id.
    #[serde(default)]
    pub id: Option<String>,
    /// Calendar year.
    #[serde(default)]
    pub year: Option<String>,
    /// Month of year.
    #[serde(default)]
    pub month: Option<String>,
}

/// Validated monthly report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    /// Reported user.
    pub userid: UserId,
    /// Reported year.
    pub year: i32,
    /// Reported month (1-12).
    pub month: u8,
}

// ============================================================================
// SECTION: Cost Validation
// ============================================================================

/// Validates a cost-creation payload and fills missing date parts from `clock`.
///
/// # Errors
///
/// Returns [`ValidationError`] with the first failing rule's message.
pub fn validate_new_cost(
    input: &CostInput,
    clock: &impl Clock,
) -> Result<CostRecord, ValidationError> {
    let required = [&input.description, &input.category, &input.userid, &input.sum];
    if required.iter().any(|field| is_missing(field.as_ref())) {
        return Err(ValidationError::new(MISSING_PARAMETERS));
    }

    let userid = parse_userid(input.userid.as_ref())?;
    let category = parse_category(input.category.as_ref())?;
    let sum = parse_sum(input.sum.as_ref())?;
    let description = parse_description(input.description.as_ref())?;

    let today = clock.today();
    let day = date_part(input.day.as_ref(), i64::from(today.day()))?;
    let month = date_part(input.month.as_ref(), i64::from(u8::from(today.month())))?;
    let year = date_part(input.year.as_ref(), i64::from(today.year()))?;
    let date =
        CostDate::from_parts(year, month, day).ok_or_else(|| ValidationError::new(INVALID_DATE))?;

    Ok(CostRecord {
        description,
        category,
        userid,
        sum,
        date,
    })
}

/// Returns true when a required value is absent, `null`, or a blank string.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Largest float user id rendered as plain digits rather than an exponent.
const MAX_PLAIN_FLOAT_USERID: f64 = 1e21;

/// Parses the user id from a JSON integer or digit-only string.
///
/// Integral floats such as `1234.0` are accepted by their plain digit form.
fn parse_userid(value: Option<&Value>) -> Result<UserId, ValidationError> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_i64().map_or_else(
            || {
                number
                    .as_f64()
                    .filter(|float| float.is_finite() && *float < MAX_PLAIN_FLOAT_USERID)
                    .and_then(|float| UserId::parse_digits(&float.to_string()))
            },
            UserId::from_raw,
        ),
        Some(Value::String(text)) => UserId::parse_digits(text),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::new(USERID_NOT_NUMBER))
}

/// Parses the category label; surrounding whitespace is not stripped.
fn parse_category(value: Option<&Value>) -> Result<Category, ValidationError> {
    match value {
        Some(Value::String(text)) => Category::parse(text),
        _ => None,
    }
    .ok_or_else(ValidationError::invalid_category)
}

/// Parses the sum from a JSON number or numeric string.
fn parse_sum(value: Option<&Value>) -> Result<Amount, ValidationError> {
    let parsed = match value {
        Some(Value::Number(number)) => Amount::from_json_number(number).ok(),
        Some(Value::String(text)) => text.parse::<Amount>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::new(SUM_NOT_NUMBER))
}

/// Trims the description; non-string descriptions are rejected.
fn parse_description(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        _ => Err(ValidationError::new(DESCRIPTION_NOT_STRING)),
    }
}

/// Resolves one date component, falling back to `default` when not supplied.
fn date_part(value: Option<&Value>, default: i64) -> Result<i64, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(default),
        Some(Value::Number(number)) => {
            number.as_i64().ok_or_else(|| ValidationError::new(INVALID_DATE))
        }
        Some(Value::String(text)) => parse_digits_i64(text.trim())
            .ok_or_else(|| ValidationError::new(INVALID_DATE)),
        Some(_) => Err(ValidationError::new(INVALID_DATE)),
    }
}

// ============================================================================
// SECTION: Report Query Validation
// ============================================================================

/// Validates a monthly report query.
///
/// # Errors
///
/// Returns [`ValidationError`] when a parameter is missing, non-numeric, or
/// the month is outside 1-12.
pub fn validate_report_query(query: &ReportQuery) -> Result<ReportRequest, ValidationError> {
    let (Some(id), Some(year), Some(month)) = (
        present(query.id.as_deref()),
        present(query.year.as_deref()),
        present(query.month.as_deref()),
    ) else {
        return Err(ValidationError::new(MISSING_PARAMETERS));
    };

    if ![id, year, month].iter().all(|raw| is_digits(raw)) {
        return Err(ValidationError::new(REPORT_PARAMS_NOT_NUMBER));
    }
    let userid =
        UserId::parse_digits(id).ok_or_else(|| ValidationError::new(REPORT_PARAMS_NOT_NUMBER))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| ValidationError::new(REPORT_PARAMS_NOT_NUMBER))?;
    let month = month
        .parse::<u8>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| ValidationError::new(MONTH_OUT_OF_RANGE))?;

    Ok(ReportRequest {
        userid,
        year,
        month,
    })
}

/// Returns the value when it is present and not blank.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

// ============================================================================
// SECTION: User Segment Validation
// ============================================================================

/// Validates the user id path segment of a user lookup.
///
/// # Errors
///
/// Returns [`ValidationError`] when the segment is empty or not digit-only.
pub fn validate_user_segment(segment: Option<&str>) -> Result<UserId, ValidationError> {
    let Some(segment) = segment.filter(|value| !value.is_empty()) else {
        return Err(ValidationError::new(USERID_REQUIRED));
    };
    UserId::parse_digits(segment).ok_or_else(|| ValidationError::new(USERID_NOT_NUMBER))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for a non-empty ASCII digit string.
fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit())
}

/// Parses a digit-only string into an `i64`.
fn parse_digits_i64(raw: &str) -> Option<i64> {
    if is_digits(raw) { raw.parse().ok() } else { None }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
