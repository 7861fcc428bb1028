// crates/cost-manager-config/src/lib.rs
// ============================================================================
// Module: Cost Manager Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for cost-manager.toml semantics.
// Dependencies: cost-manager-core, cost-manager-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `cost-manager-config` defines the configuration model for the Cost
//! Manager server: bind address and body limits, request audit logging, the
//! store backend, the static team list, and the users seeded at startup.
//! Validation is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
