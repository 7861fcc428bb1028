// crates/cost-manager-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Unit tests for argument parsing and config validation.
// Purpose: Ensure commands parse as documented and config errors fail closed.
// Dependencies: cost-manager-cli main helpers
// ============================================================================

//! ## Overview
//! Parses representative command lines and runs `config validate` against
//! temporary files.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::ConfigValidateCommand;
use super::command_config_validate;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn serve_accepts_config_path() {
    let cli = Cli::try_parse_from(["cost-manager", "serve", "--config", "site.toml"]).unwrap();
    let Some(Commands::Serve(command)) = cli.command else {
        panic!("expected serve command");
    };
    assert_eq!(command.config, Some(PathBuf::from("site.toml")));
}

#[test]
fn config_validate_parses_without_path() {
    let cli = Cli::try_parse_from(["cost-manager", "config", "validate"]).unwrap();
    let Some(Commands::Config {
        command: ConfigCommand::Validate(command),
    }) = cli.command
    else {
        panic!("expected config validate command");
    };
    assert!(command.config.is_none());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["cost-manager", "migrate"]).is_err());
}

// ============================================================================
// SECTION: Config Validation
// ============================================================================

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cost-manager.toml");
    std::fs::write(&path, "[server]\nbind = \"127.0.0.1:4000\"\n").unwrap();
    let command = ConfigValidateCommand {
        config: Some(path),
    };
    assert!(command_config_validate(&command).is_ok());
}

#[test]
fn config_validate_reports_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cost-manager.toml");
    std::fs::write(&path, "[store]\ntype = \"sqlite\"\n").unwrap();
    let command = ConfigValidateCommand {
        config: Some(path),
    };
    let err = command_config_validate(&command).unwrap_err();
    assert!(err.to_string().contains("sqlite store requires path"));
}
