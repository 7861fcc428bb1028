// crates/cost-manager-server/src/server/tests.rs
// ============================================================================
// Module: Cost Server Unit Tests
// Description: Unit tests for request decoding and response rendering.
// Purpose: Validate handler helpers with in-memory fixtures.
// Dependencies: cost-manager-server
// ============================================================================

//! ## Overview
//! Exercises body decoding, the `Message` header contract, JSON rendering,
//! and audit annotations without binding a socket.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only handler assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use cost_manager_config::TeamMember;
use cost_manager_core::CostRecord;
use cost_manager_core::CostService;
use cost_manager_core::CostStore;
use cost_manager_core::FixedClock;
use cost_manager_core::InMemoryCostStore;
use cost_manager_core::SharedClock;
use cost_manager_core::SharedCostStore;
use cost_manager_core::StoreError;
use cost_manager_core::UserId;
use cost_manager_core::UserRecord;
use serde_json::Value;
use serde_json::json;
use time::macros::date;

use super::COST_ADDED;
use super::ServerState;
use super::USER_REPORT_READY;
use super::add_cost_response;
use super::parse_cost_input;
use super::user_summary_response;
use crate::audit::NoopAuditSink;
use crate::error::AuditNote;
use crate::error::BODY_NOT_OBJECT;
use crate::error::MALFORMED_JSON;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

struct FailingStore;

impl CostStore for FailingStore {
    fn insert_cost(&self, _cost: &CostRecord) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".to_string()))
    }

    fn costs_for_month(
        &self,
        _userid: UserId,
        _year: i32,
        _month: u8,
    ) -> Result<Vec<CostRecord>, StoreError> {
        Err(StoreError::Io("disk gone".to_string()))
    }

    fn costs_for_user(&self, _userid: UserId) -> Result<Vec<CostRecord>, StoreError> {
        Err(StoreError::Io("disk gone".to_string()))
    }

    fn upsert_user(&self, _user: &UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".to_string()))
    }

    fn find_user(&self, _userid: UserId) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Io("disk gone".to_string()))
    }
}

fn state_with(store: SharedCostStore, pretty_json: bool) -> ServerState {
    ServerState {
        service: CostService::new(
            store,
            SharedClock::from_clock(FixedClock::new(date!(2025 - 03 - 14))),
        ),
        team: vec![TeamMember::new("Hadar", "Daya")],
        pretty_json,
        max_body_bytes: 256,
        audit: Arc::new(NoopAuditSink),
    }
}

fn memory_state() -> ServerState {
    state_with(SharedCostStore::from_store(InMemoryCostStore::new()), true)
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header(response: &Response, name: &str) -> Option<String> {
    response.headers().get(name).map(|value| value.to_str().unwrap().to_string())
}

// ============================================================================
// SECTION: Body Decoding
// ============================================================================

#[test]
fn empty_body_decodes_as_empty_object() {
    let input = parse_cost_input(b"  \n", 256).unwrap();
    assert!(input.description.is_none());
    assert!(input.sum.is_none());
}

#[test]
fn malformed_and_non_object_bodies_are_bad_requests() {
    let err = parse_cost_input(b"{\"sum\": ", 256).unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), MALFORMED_JSON);

    let err = parse_cost_input(b"[1, 2]", 256).unwrap_err();
    assert_eq!(err.message(), BODY_NOT_OBJECT);
}

#[test]
fn oversized_body_is_rejected_before_parsing() {
    let err = parse_cost_input(&[b' '; 300], 256).unwrap_err();
    assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// SECTION: Responses
// ============================================================================

#[tokio::test]
async fn created_cost_carries_message_header_and_defaults() {
    let state = memory_state();
    let body = Bytes::from_static(
        br#"{"description":"Valid UserID String","category":"Food","userid":"1234","sum":20}"#,
    );
    let response = add_cost_response(&state, Ok(body));
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(header(&response, "message").as_deref(), Some(COST_ADDED));
    assert_eq!(header(&response, CONTENT_TYPE.as_str()).as_deref(), Some("application/json"));

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "cost": {
                "description": "Valid UserID String",
                "category": "food",
                "userid": 1234,
                "sum": 20,
                "day": 14,
                "month": 3,
                "year": 2025
            }
        })
    );
}

#[tokio::test]
async fn validation_failure_renders_error_body() {
    let state = memory_state();
    let body = Bytes::from_static(br#"{"category":"food","userid":456456,"sum":10}"#);
    let response = add_cost_response(&state, Ok(body));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(header(&response, "message").is_none());
    let note = response.extensions().get::<AuditNote>().cloned().unwrap();
    assert_eq!(note.kind, "validation");
    assert_eq!(
        body_json(response).await,
        json!({"error": "One or more required parameters are missing"})
    );
}

#[tokio::test]
async fn store_failure_hides_detail_and_annotates_audit() {
    let state = state_with(SharedCostStore::from_store(FailingStore), false);
    let body = Bytes::from_static(br#"{"description":"x","category":"food","userid":1,"sum":1}"#);
    let response = add_cost_response(&state, Ok(body));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let note = response.extensions().get::<AuditNote>().cloned().unwrap();
    assert!(note.detail.unwrap().contains("disk full"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], br#"{"error":"Internal server error"}"#);
}

#[tokio::test]
async fn user_summary_requires_segment_and_reports_total() {
    let state = memory_state();
    let response = user_summary_response(&state, None);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Userid is required"}));

    state
        .service
        .seed_users(&[UserRecord {
            id: UserId::from_raw(7).unwrap(),
            first_name: "mosh".to_string(),
            last_name: "israeli".to_string(),
            birthday: None,
            marital_status: None,
        }])
        .unwrap();
    for sum in ["0.1", "0.2"] {
        let payload = format!(r#"{{"description":"d","category":"sport","userid":7,"sum":{sum}}}"#);
        let response = add_cost_response(&state, Ok(Bytes::from(payload)));
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = user_summary_response(&state, Some("7"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "message").as_deref(), Some(USER_REPORT_READY));
    assert_eq!(
        body_json(response).await,
        json!({"first_name": "mosh", "last_name": "israeli", "id": 7, "total": 0.3})
    );
}

#[tokio::test]
async fn pretty_json_uses_two_space_indent() {
    let state = memory_state();
    let response = user_summary_response(&state, Some(""));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        "{\n  \"error\": \"Userid is required\"\n}"
    );
}
