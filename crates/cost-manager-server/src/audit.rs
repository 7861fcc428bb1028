// crates/cost-manager-server/src/audit.rs
// ============================================================================
// Module: Request Audit Logging
// Description: Structured audit events for HTTP request handling.
// Purpose: Emit one JSON line per request without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the request audit event payload and the sinks that
//! write it. Events are single-line JSON so they can be routed to any log
//! pipeline. Write failures are dropped; auditing never fails a request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cost_manager_config::ServerAuditConfig;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// 2xx response.
    Success,
    /// 4xx response.
    ClientError,
    /// 5xx response.
    ServerError,
}

impl RequestOutcome {
    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            500 ..= 599 => Self::ServerError,
            400 ..= 499 => Self::ClientError,
            _ => Self::Success,
        }
    }
}

/// HTTP request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Outcome classification.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Handler duration in milliseconds.
    pub duration_ms: u64,
    /// Internal error detail (server errors only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// Inputs required to construct a request audit event.
pub struct RequestAuditEventParams {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Handler duration in milliseconds.
    pub duration_ms: u64,
    /// Internal error detail.
    pub error_detail: Option<String>,
}

impl RequestAuditEvent {
    /// Creates a new request audit event stamped with the current time.
    #[must_use]
    pub fn new(params: RequestAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "http_request",
            timestamp_ms,
            method: params.method,
            path: params.path,
            status: params.status,
            outcome: RequestOutcome::from_status(params.status),
            error_kind: params.error_kind,
            duration_ms: params.duration_ms,
            error_detail: params.error_detail,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for HTTP request events.
pub trait RequestAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RequestAuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RequestAuditSink for FileAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl RequestAuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}

/// Builds the sink selected by the audit configuration.
///
/// # Errors
///
/// Returns an error when the configured audit file cannot be opened.
pub fn audit_sink_from_config(
    config: &ServerAuditConfig,
) -> io::Result<Arc<dyn RequestAuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Arc::new(FileAuditSink::new(Path::new(path.trim()))?)),
        None => Ok(Arc::new(StderrAuditSink)),
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
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use cost_manager_config::ServerAuditConfig;
    use serde_json::Value;

    use super::RequestAuditEvent;
    use super::RequestAuditEventParams;
    use super::RequestOutcome;
    use super::audit_sink_from_config;

    fn event(status: u16) -> RequestAuditEvent {
        RequestAuditEvent::new(RequestAuditEventParams {
            method: "GET".to_string(),
            path: "/api/report".to_string(),
            status,
            error_kind: None,
            duration_ms: 3,
            error_detail: None,
        })
    }

    #[test]
    fn outcome_follows_status_class() {
        assert_eq!(RequestOutcome::from_status(201), RequestOutcome::Success);
        assert_eq!(RequestOutcome::from_status(404), RequestOutcome::ClientError);
        assert_eq!(RequestOutcome::from_status(500), RequestOutcome::ServerError);
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let config = ServerAuditConfig {
            enabled: true,
            path: Some(path.display().to_string()),
        };
        let sink = audit_sink_from_config(&config).unwrap();
        sink.record(&event(200));
        sink.record(&event(400));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "http_request");
        assert_eq!(lines[1]["outcome"], "client_error");
        assert!(lines[0].get("error_detail").is_none());
    }
}
