// crates/cost-manager-server/src/error.rs
// ============================================================================
// Module: API Errors
// Description: HTTP error mapping for cost service failures.
// Purpose: Map domain errors to status codes and `{"error": ...}` bodies.
// Dependencies: axum, cost-manager-core
// ============================================================================

//! ## Overview
//! [`ApiError`] is the single seam between [`ServiceError`] and HTTP. Client
//! errors carry their message to the caller; store failures are reduced to a
//! generic message and their detail is kept for the audit log only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::StatusCode;
use cost_manager_core::ServiceError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Body message for store failures.
pub const INTERNAL_ERROR: &str = "Internal server error";
/// Body message for unmatched routes.
pub const ROUTE_NOT_FOUND: &str = "Not found";
/// Body message for unparseable JSON request bodies.
pub const MALFORMED_JSON: &str = "Request body must be valid JSON";
/// Body message for JSON bodies that are not objects.
pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";
/// Body message for oversized request bodies.
pub const BODY_TOO_LARGE: &str = "Request body too large";
/// Body message for unreadable request bodies.
pub const BODY_UNREADABLE: &str = "Request body could not be read";
/// Body message for unparseable query strings.
pub const MALFORMED_QUERY: &str = "Query string could not be parsed";

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP-facing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    status: StatusCode,
    /// Message rendered in the `error` field.
    message: String,
    /// Normalized label recorded in the audit log.
    kind: &'static str,
    /// Internal detail recorded in the audit log.
    detail: Option<String>,
}

impl ApiError {
    /// Builds a 400 error.
    #[must_use]
    pub fn bad_request(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            kind,
            detail: None,
        }
    }

    /// Builds a 404 error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            kind: "not_found",
            detail: None,
        }
    }

    /// Builds a 404 error for unmatched routes.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self {
            kind: "route_not_found",
            ..Self::not_found(ROUTE_NOT_FOUND)
        }
    }

    /// Builds a 413 error.
    #[must_use]
    pub fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: BODY_TOO_LARGE.to_string(),
            kind: "payload_too_large",
            detail: None,
        }
    }

    /// Builds a 500 error with an internal detail.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR.to_string(),
            kind: "store",
            detail: Some(detail.into()),
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the audit note for this error.
    #[must_use]
    pub fn audit_note(&self) -> AuditNote {
        AuditNote {
            kind: self.kind,
            detail: self.detail.clone(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(err) => Self::bad_request("validation", err.message()),
            ServiceError::NotFound(err) => Self::not_found(err.message()),
            ServiceError::Store(err) => Self::internal(err.to_string()),
        }
    }
}

/// Error annotation carried in response extensions for the audit layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditNote {
    /// Normalized error kind.
    pub kind: &'static str,
    /// Internal detail, if any.
    pub detail: Option<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
