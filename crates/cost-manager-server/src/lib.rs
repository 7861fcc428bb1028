// crates/cost-manager-server/src/lib.rs
// ============================================================================
// Module: Cost Manager Server
// Description: HTTP/JSON API for the cost manager.
// Purpose: Serve cost creation, monthly reports, and user totals over axum.
// Dependencies: cost-manager-core, cost-manager-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server crate exposes [`CostServer`], which builds a cost store from
//! [`cost_manager_config::CostManagerConfig`] and serves the cost manager API.
//! All business rules live in `cost-manager-core`; handlers decode requests
//! and map [`cost_manager_core::ServiceError`] through [`ApiError`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::RequestAuditSink;
pub use audit::RequestOutcome;
pub use audit::StderrAuditSink;
pub use error::ApiError;
pub use server::CostServer;
pub use server::ServerError;
