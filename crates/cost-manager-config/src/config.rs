// crates/cost-manager-config/src/config.rs
// ============================================================================
// Module: Cost Manager Configuration
// Description: Configuration loading and validation for the Cost Manager.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: cost-manager-core, cost-manager-store-sqlite, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an empty file yields a loopback server on port
//! 3000 with an in-memory store, the default team, and no seeded users.
//! Invalid values fail closed rather than falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use cost_manager_core::MaritalStatus;
use cost_manager_core::UserId;
use cost_manager_core::UserRecord;
use cost_manager_store_sqlite::SqliteStoreConfig;
use cost_manager_store_sqlite::SqliteStoreMode;
use cost_manager_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cost-manager.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "COST_MANAGER_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:3000";
/// Default busy timeout for the sqlite store (ms).
pub(crate) const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a name field.
pub(crate) const MAX_NAME_LENGTH: usize = 256;
/// Accepted birthday format.
const BIRTHDAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Cost Manager configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CostManagerConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Team members served by the about endpoint.
    #[serde(default = "default_team")]
    pub team: Vec<TeamMember>,
    /// Users upserted into the store at startup.
    #[serde(default)]
    pub users: Vec<UserSeedConfig>,
}

impl Default for CostManagerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            team: default_team(),
            users: Vec::new(),
        }
    }
}

impl CostManagerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then `COST_MANAGER_CONFIG`, then
    /// `cost-manager.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// Names are trimmed in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        for member in &mut self.team {
            member.validate()?;
        }
        let mut seen = BTreeSet::new();
        for user in &mut self.users {
            user.validate()?;
            if !seen.insert(user.id) {
                return Err(ConfigError::Invalid(format!("duplicate user id {}", user.id)));
            }
        }
        Ok(())
    }

    /// Returns the user records to seed into the store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a seed entry cannot be converted.
    pub fn user_records(&self) -> Result<Vec<UserRecord>, ConfigError> {
        self.users.iter().map(UserSeedConfig::to_record).collect()
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Pretty-print JSON responses with two-space indentation.
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
    /// Request audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            pretty_json: default_pretty_json(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        self.bind_addr()?;
        self.audit.validate()
    }
}

/// Request audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuditConfig {
    /// Enable request audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Cost store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the sqlite store configuration, or `None` for the memory backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }

    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())
            }
        }
    }
}

// ============================================================================
// SECTION: Team
// ============================================================================

/// Team member listed by the about endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl TeamMember {
    /// Creates a team member.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Trims and validates names.
    fn validate(&mut self) -> Result<(), ConfigError> {
        self.first_name = validate_name("team.first_name", &self.first_name)?;
        self.last_name = validate_name("team.last_name", &self.last_name)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Users
// ============================================================================

/// User seeded into the store at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSeedConfig {
    /// User identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional birthday as `YYYY-MM-DD`.
    #[serde(default)]
    pub birthday: Option<String>,
    /// Optional marital status.
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
}

impl UserSeedConfig {
    /// Converts the seed entry into a user record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the id is negative or the birthday does
    /// not parse.
    pub fn to_record(&self) -> Result<UserRecord, ConfigError> {
        let id = UserId::from_raw(self.id)
            .ok_or_else(|| ConfigError::Invalid(format!("user id must be >= 0: {}", self.id)))?;
        let birthday = self
            .birthday
            .as_deref()
            .map(|raw| {
                Date::parse(raw.trim(), BIRTHDAY_FORMAT).map_err(|_| {
                    ConfigError::Invalid(format!("user {} birthday must be YYYY-MM-DD", self.id))
                })
            })
            .transpose()?;
        Ok(UserRecord {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birthday,
            marital_status: self.marital_status,
        })
    }

    /// Trims and validates the entry.
    fn validate(&mut self) -> Result<(), ConfigError> {
        self.first_name = validate_name("users.first_name", &self.first_name)?;
        self.last_name = validate_name("users.last_name", &self.last_name)?;
        self.to_record().map(|_| ())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Returns the trimmed name or rejects blank and overlong values.
fn validate_name(field: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(trimmed.to_string())
}

/// Returns the default team list.
pub(crate) fn default_team() -> Vec<TeamMember> {
    vec![TeamMember::new("Hadar", "Daya"), TeamMember::new("Yotam", "Haimovitch")]
}

/// Returns the default bind address.
pub(crate) fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default max body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Returns the default JSON formatting mode.
pub(crate) const fn default_pretty_json() -> bool {
    true
}

/// Returns the default audit toggle.
pub(crate) const fn default_audit_enabled() -> bool {
    true
}

/// Returns the default sqlite busy timeout.
pub(crate) const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Tests
// ============================================================================
