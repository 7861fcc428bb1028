//! Config semantic validation tests for cost-manager-config.
// crates/cost-manager-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate defaults and fail-closed section checks.
// Purpose: Ensure invalid server, store, team, and user entries are rejected.
// =============================================================================

use cost_manager_config::ConfigError;
use cost_manager_config::CostManagerConfig;
use cost_manager_config::StoreType;
use cost_manager_config::TeamMember;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CostManagerConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = CostManagerConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:3000" {
        return Err(format!("unexpected bind {}", config.server.bind));
    }
    if config.server.max_body_bytes != 1024 * 1024 || !config.server.pretty_json {
        return Err("unexpected server defaults".to_string());
    }
    if !config.server.audit.enabled || config.server.audit.path.is_some() {
        return Err("unexpected audit defaults".to_string());
    }
    if config.store.store_type != StoreType::Memory || config.store.sqlite_config().is_some() {
        return Err("default store should be memory".to_string());
    }
    let expected = vec![TeamMember::new("Hadar", "Daya"), TeamMember::new("Yotam", "Haimovitch")];
    if config.team != expected {
        return Err(format!("unexpected default team size {}", config.team.len()));
    }
    if !config.users.is_empty() {
        return Err("no users expected by default".to_string());
    }
    Ok(())
}

#[test]
fn default_impl_matches_empty_file() -> TestResult {
    let config = CostManagerConfig::default();
    if config.team.len() != 2 || config.server.bind != "127.0.0.1:3000" {
        return Err("Default impl diverges from empty-file defaults".to_string());
    }
    Ok(())
}

#[test]
fn rejects_zero_body_limit() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[server]\nmax_body_bytes = 0\n"),
        "max_body_bytes must be greater than zero",
    )
}

#[test]
fn rejects_unparseable_bind() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[server]\nbind = \"localhost\"\n"),
        "invalid bind address",
    )
}

#[test]
fn rejects_blank_audit_path() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[server.audit]\npath = \"  \"\n"),
        "audit.path must be non-empty",
    )
}

#[test]
fn rejects_memory_store_with_path() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[store]\ntype = \"memory\"\npath = \"x.sqlite\"\n"),
        "memory store must not set path",
    )
}

#[test]
fn rejects_sqlite_store_without_path() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[store]\ntype = \"sqlite\"\n"),
        "sqlite store requires path",
    )
}

#[test]
fn rejects_unknown_store_type() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[store]\ntype = \"postgres\"\n"),
        "config parse error",
    )
}

#[test]
fn rejects_blank_team_name() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[[team]]\nfirst_name = \" \"\nlast_name = \"Daya\"\n"),
        "team.first_name must be non-empty",
    )
}

#[test]
fn trims_team_names() -> TestResult {
    let config = CostManagerConfig::from_toml_str(
        "[[team]]\nfirst_name = \" Hadar \"\nlast_name = \"Daya\"\n",
    )
    .map_err(|err| err.to_string())?;
    if config.team != vec![TeamMember::new("Hadar", "Daya")] {
        return Err("team names not trimmed".to_string());
    }
    Ok(())
}

#[test]
fn rejects_duplicate_user_ids() -> TestResult {
    let toml = "[[users]]\nid = 1\nfirst_name = \"a\"\nlast_name = \"b\"\n\
                [[users]]\nid = 1\nfirst_name = \"c\"\nlast_name = \"d\"\n";
    assert_invalid(CostManagerConfig::from_toml_str(toml), "duplicate user id 1")
}

#[test]
fn rejects_negative_user_id() -> TestResult {
    assert_invalid(
        CostManagerConfig::from_toml_str("[[users]]\nid = -4\nfirst_name = \"a\"\nlast_name = \"b\"\n"),
        "user id must be >= 0",
    )
}

#[test]
fn rejects_malformed_birthday() -> TestResult {
    let toml = "[[users]]\nid = 4\nfirst_name = \"a\"\nlast_name = \"b\"\nbirthday = \"10/01/1990\"\n";
    assert_invalid(CostManagerConfig::from_toml_str(toml), "birthday must be YYYY-MM-DD")
}

#[test]
fn rejects_unknown_marital_status() -> TestResult {
    let toml =
        "[[users]]\nid = 4\nfirst_name = \"a\"\nlast_name = \"b\"\nmarital_status = \"complicated\"\n";
    assert_invalid(CostManagerConfig::from_toml_str(toml), "config parse error")
}
