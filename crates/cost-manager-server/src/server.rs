// crates/cost-manager-server/src/server.rs
// ============================================================================
// Module: Cost Manager HTTP Server
// Description: axum router and handlers for the cost manager API.
// Purpose: Expose team info, cost creation, monthly reports, and user totals.
// Dependencies: cost-manager-core, cost-manager-config, axum, tokio
// ============================================================================

//! ## Overview
//! [`CostServer`] wires a configured [`CostStore`](cost_manager_core::CostStore)
//! into a [`CostService`] and serves it over HTTP/JSON. Every handler routes
//! through the service; this module only decodes requests, maps errors via
//! [`ApiError`], and renders JSON with the `Message` header contract.
//! Request bodies and query strings are untrusted and are size-limited and
//! validated before reaching the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use cost_manager_config::CostManagerConfig;
use cost_manager_config::ServerConfig;
use cost_manager_config::StoreConfig;
use cost_manager_config::StoreType;
use cost_manager_config::TeamMember;
use cost_manager_core::CostInput;
use cost_manager_core::CostRecord;
use cost_manager_core::CostService;
use cost_manager_core::InMemoryCostStore;
use cost_manager_core::ReportQuery;
use cost_manager_core::SharedClock;
use cost_manager_core::SharedCostStore;
use cost_manager_core::SystemClock;
use cost_manager_core::validation::USERID_NOT_NUMBER;
use cost_manager_store_sqlite::SqliteCostStore;
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditEventParams;
use crate::audit::RequestAuditSink;
use crate::audit::audit_sink_from_config;
use crate::error::ApiError;
use crate::error::AuditNote;
use crate::error::BODY_NOT_OBJECT;
use crate::error::BODY_UNREADABLE;
use crate::error::MALFORMED_JSON;
use crate::error::MALFORMED_QUERY;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plain-text body served at `/`.
pub const WELCOME_MESSAGE: &str = "Welcome to BudgetBuddy Cost Manager API!";
/// `Message` header sent with a created cost.
pub const COST_ADDED: &str = "Cost added successfully";
/// `Message` header sent with a monthly report.
pub const REPORT_READY: &str = "Monthly report is ready";
/// `Message` header sent with a user summary.
pub const USER_REPORT_READY: &str = "User details and total cost report is ready";

/// Response header carrying the human-readable outcome.
const MESSAGE_HEADER: HeaderName = HeaderName::from_static("message");

// ============================================================================
// SECTION: Cost Server
// ============================================================================

/// Cost manager HTTP server.
pub struct CostServer {
    /// Validated configuration.
    config: CostManagerConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl CostServer {
    /// Builds a server from configuration, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or the store, the
    /// audit sink, or user seeding fails.
    pub fn from_config(mut config: CostManagerConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_cost_store(&config.store)?;
        let audit = audit_sink_from_config(&config.server.audit)
            .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
        let server = Self::with_parts(config, store, SharedClock::from_clock(SystemClock), audit)?;
        emit_non_loopback_warning(&server.config.server);
        Ok(server)
    }

    /// Builds a server over an injected store, clock, and audit sink.
    ///
    /// Configured users are upserted into the store before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or seeding fails.
    pub fn with_parts(
        mut config: CostManagerConfig,
        store: SharedCostStore,
        clock: SharedClock,
        audit: Arc<dyn RequestAuditSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let users = config.user_records().map_err(|err| ServerError::Config(err.to_string()))?;
        let service = CostService::new(store, clock);
        service.seed_users(&users).map_err(|err| ServerError::Init(err.to_string()))?;
        let state = Arc::new(ServerState {
            service,
            team: config.team.clone(),
            pretty_json: config.server.pretty_json,
            max_body_bytes: config.server.max_body_bytes,
            audit,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub const fn config(&self) -> &CostManagerConfig {
        &self.config
    }

    /// Returns the cost service behind the handlers.
    #[must_use]
    pub fn service(&self) -> &CostService {
        &self.state.service
    }

    /// Builds the axum router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_with_listener(listener).await
    }

    /// Serves requests on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server fails.
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the cost store selected by the store configuration.
fn build_cost_store(config: &StoreConfig) -> Result<SharedCostStore, ServerError> {
    let store = match config.store_type {
        StoreType::Memory => SharedCostStore::from_store(InMemoryCostStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config
                .sqlite_config()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let store = SqliteCostStore::open(&sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            SharedCostStore::from_store(store)
        }
    };
    Ok(store)
}

/// Warns on stderr when the bind address is reachable beyond loopback.
fn emit_non_loopback_warning(server: &ServerConfig) {
    if let Ok(addr) = server.bind_addr()
        && !addr.ip().is_loopback()
    {
        let _ = writeln!(
            std::io::stderr(),
            "cost-manager: WARNING: server bound to non-loopback address {addr}; the API has no \
             authentication"
        );
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Shared state for HTTP handlers.
struct ServerState {
    /// Cost operation facade.
    service: CostService,
    /// Team members served at `/api/about`.
    team: Vec<TeamMember>,
    /// Whether JSON bodies are indented.
    pretty_json: bool,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Request audit sink.
    audit: Arc<dyn RequestAuditSink>,
}

/// Builds the router with audit and body-limit layers.
fn build_router(state: Arc<ServerState>) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route("/", get(handle_home))
        .route("/api/about", get(handle_about))
        .route("/api/add", post(handle_add))
        .route("/api/report", get(handle_report))
        .route("/api/users", get(handle_users_root))
        .route("/api/users/", get(handle_users_root))
        .route("/api/users/{id}", get(handle_user))
        .fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(Arc::clone(&state), audit_requests))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Records one audit event per request.
async fn audit_requests(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (error_kind, error_detail) = response
        .extensions()
        .get::<AuditNote>()
        .cloned()
        .map_or((None, None), |note| (Some(note.kind), note.detail));
    state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
        method,
        path,
        status: response.status().as_u16(),
        error_kind,
        duration_ms,
        error_detail,
    }));
    response
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Serves the plain-text welcome message.
async fn handle_home() -> &'static str {
    WELCOME_MESSAGE
}

/// Returns the configured team members.
async fn handle_about(State(state): State<Arc<ServerState>>) -> Response {
    state.json_response(StatusCode::OK, None, &state.team)
}

/// Validates and stores a cost.
async fn handle_add(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    add_cost_response(&state, body)
}

/// Returns the monthly report for a user.
async fn handle_report(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(query)| query);
    report_response(&state, query)
}

/// Rejects user lookups without an id segment.
async fn handle_users_root(State(state): State<Arc<ServerState>>) -> Response {
    user_summary_response(&state, None)
}

/// Returns the summary for one user.
async fn handle_user(
    State(state): State<Arc<ServerState>>,
    segment: Result<Path<String>, PathRejection>,
) -> Response {
    match segment {
        Ok(Path(segment)) => user_summary_response(&state, Some(&segment)),
        Err(_) => state.error_response(&ApiError::bad_request("validation", USERID_NOT_NUMBER)),
    }
}

/// Answers unknown routes and methods.
async fn handle_not_found(State(state): State<Arc<ServerState>>) -> Response {
    state.error_response(&ApiError::route_not_found())
}

/// Created-cost response body.
#[derive(Serialize)]
struct CostCreated<'a> {
    /// Stored cost record.
    cost: &'a CostRecord,
}

/// Error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    /// Client-facing message.
    error: &'a str,
}

/// Renders the outcome of adding a cost.
fn add_cost_response(state: &ServerState, body: Result<Bytes, BytesRejection>) -> Response {
    let result = body
        .map_err(|rejection| body_rejection(&rejection))
        .and_then(|bytes| parse_cost_input(&bytes, state.max_body_bytes))
        .and_then(|input| run_blocking(|| state.service.add_cost(&input)).map_err(ApiError::from));
    match result {
        Ok(cost) => state.json_response(
            StatusCode::CREATED,
            Some(COST_ADDED),
            &CostCreated {
                cost: &cost,
            },
        ),
        Err(error) => state.error_response(&error),
    }
}

/// Renders the outcome of a monthly report query.
fn report_response(state: &ServerState, query: Result<ReportQuery, QueryRejection>) -> Response {
    let result = query
        .map_err(|_| ApiError::bad_request("malformed_query", MALFORMED_QUERY))
        .and_then(|query| {
            run_blocking(|| state.service.monthly_report(&query)).map_err(ApiError::from)
        });
    match result {
        Ok(report) => state.json_response(StatusCode::OK, Some(REPORT_READY), &report),
        Err(error) => state.error_response(&error),
    }
}

/// Renders the outcome of a user summary lookup.
fn user_summary_response(state: &ServerState, segment: Option<&str>) -> Response {
    match run_blocking(|| state.service.user_summary(segment)) {
        Ok(summary) => state.json_response(StatusCode::OK, Some(USER_REPORT_READY), &summary),
        Err(error) => state.error_response(&ApiError::from(error)),
    }
}

/// Decodes a cost payload; an empty body is an empty object.
fn parse_cost_input(bytes: &[u8], max_body_bytes: usize) -> Result<CostInput, ApiError> {
    if bytes.len() > max_body_bytes {
        return Err(ApiError::payload_too_large());
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CostInput::default());
    }
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|_| ApiError::bad_request("malformed_json", MALFORMED_JSON))?;
    if !value.is_object() {
        return Err(ApiError::bad_request("malformed_json", BODY_NOT_OBJECT));
    }
    serde_json::from_value(value)
        .map_err(|_| ApiError::bad_request("malformed_json", BODY_NOT_OBJECT))
}

/// Maps a body extraction failure onto an API error.
fn body_rejection(rejection: &BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large()
    } else {
        ApiError::bad_request("body_unreadable", BODY_UNREADABLE)
    }
}

/// Runs a store-backed operation, shifting to a blocking context when available.
fn run_blocking<T>(operation: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(operation)
        }
        _ => operation(),
    }
}

// ============================================================================
// SECTION: Response Rendering
// ============================================================================

impl ServerState {
    /// Serializes a body honoring the pretty-print setting.
    fn encode<T: Serialize + ?Sized>(&self, body: &T) -> Result<Vec<u8>, serde_json::Error> {
        if self.pretty_json { serde_json::to_vec_pretty(body) } else { serde_json::to_vec(body) }
    }

    /// Renders a JSON response with an optional `Message` header.
    fn json_response<T: Serialize + ?Sized>(
        &self,
        status: StatusCode,
        message: Option<&'static str>,
        body: &T,
    ) -> Response {
        match self.encode(body) {
            Ok(bytes) => {
                let mut response = json_bytes(status, bytes);
                if let Some(message) = message {
                    let value = HeaderValue::from_static(message);
                    response.headers_mut().insert(MESSAGE_HEADER, value);
                }
                response
            }
            Err(err) => {
                self.error_response(&ApiError::internal(format!("response encoding failed: {err}")))
            }
        }
    }

    /// Renders an error body and attaches its audit note.
    fn error_response(&self, error: &ApiError) -> Response {
        let bytes = self
            .encode(&ErrorBody {
                error: error.message(),
            })
            .unwrap_or_default();
        let mut response = json_bytes(error.status(), bytes);
        response.extensions_mut().insert(error.audit_note());
        response
    }
}

/// Wraps encoded JSON bytes in a response with the JSON content type.
fn json_bytes(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = (status, bytes).into_response();
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cost server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests;
