//! Config load validation tests for cost-manager-config.
// crates/cost-manager-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use cost_manager_config::ConfigError;
use cost_manager_config::CostManagerConfig;
use cost_manager_config::StoreType;
use tempfile::NamedTempFile;

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
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(
        CostManagerConfig::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        CostManagerConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(CostManagerConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'a'; 1_048_577])?;
    assert_invalid(CostManagerConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(CostManagerConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config(b"[server\nbind = ")?;
    assert_invalid(CostManagerConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_accepts_full_config() -> TestResult {
    let file = write_config(
        br#"
[server]
bind = "127.0.0.1:8080"
max_body_bytes = 4096
pretty_json = false

[server.audit]
enabled = false

[store]
type = "sqlite"
path = "data/costs.sqlite"
journal_mode = "delete"
sync_mode = "normal"

[[team]]
first_name = "Ada"
last_name = "Lovelace"

[[users]]
id = 123123
first_name = "mosh"
last_name = "israeli"
birthday = "1990-01-10"
marital_status = "single"
"#,
    )?;
    let config = CostManagerConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let server = &config.server;
    if server.max_body_bytes != 4096 || server.pretty_json || server.audit.enabled {
        return Err("server section not applied".to_string());
    }
    if config.store.store_type != StoreType::Sqlite || config.store.sqlite_config().is_none() {
        return Err("store section not applied".to_string());
    }
    if config.team.len() != 1 || config.team[0].first_name != "Ada" {
        return Err("team section should replace defaults".to_string());
    }
    let users = config.user_records().map_err(|err| err.to_string())?;
    if users.len() != 1 || users[0].birthday.is_none() {
        return Err("users section not applied".to_string());
    }
    Ok(())
}
