// crates/cost-manager-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Cost Store
// Description: Durable CostStore backed by SQLite WAL.
// Purpose: Persist cost and user records with exact decimal sums.
// Dependencies: cost-manager-core, rusqlite, serde, thiserror, time
// ============================================================================

//! ## Overview
//! This module implements a durable [`CostStore`] using `SQLite`. A single
//! connection is shared behind a mutex; every write is committed before the
//! call returns, so a created cost is visible to the next query. Loads decode
//! every column back into validated core types and fail closed on anything
//! that does not round-trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use cost_manager_core::Amount;
use cost_manager_core::Category;
use cost_manager_core::CostDate;
use cost_manager_core::CostRecord;
use cost_manager_core::CostStore;
use cost_manager_core::MaritalStatus;
use cost_manager_core::StoreError;
use cost_manager_core::UserId;
use cost_manager_core::UserRecord;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Storage format for birthdays.
const BIRTHDAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` cost store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a configuration for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row cannot be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => {
                Self::Invalid(format!("schema version mismatch: {message}"))
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed cost store.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Cost rows are returned in insertion (rowid) order.
#[derive(Clone)]
pub struct SqliteCostStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCostStore {
    /// Opens an `SQLite`-backed cost store, creating the schema when needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is unusable, the database
    /// cannot be opened, or the stored schema version is unsupported.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs `f` with the locked connection.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, SqliteStoreError>,
    ) -> Result<T, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        f(&mut guard)
    }

    /// Loads cost rows matching a filter clause.
    fn query_costs(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<CostRecord>, SqliteStoreError> {
        self.with_connection(|connection| {
            let mut statement = connection.prepare(sql)?;
            let rows = statement.query_map(params, |row| {
                Ok(CostRow {
                    userid: row.get(0)?,
                    description: row.get(1)?,
                    category: row.get(2)?,
                    sum: row.get(3)?,
                    day: row.get(4)?,
                    month: row.get(5)?,
                    year: row.get(6)?,
                })
            })?;
            let mut costs = Vec::new();
            for row in rows {
                costs.push(row?.into_record()?);
            }
            Ok(costs)
        })
    }
}

impl CostStore for SqliteCostStore {
    fn insert_cost(&self, cost: &CostRecord) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            let tx = connection.transaction()?;
            tx.execute(
                "INSERT INTO costs (userid, description, category, sum, day, month, year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    cost.userid.get(),
                    cost.description,
                    cost.category.as_str(),
                    cost.sum.to_canonical_string(),
                    i64::from(cost.date.day()),
                    i64::from(cost.date.month()),
                    i64::from(cost.date.year()),
                ],
            )?;
            tx.commit()?;
            Ok(())
        })
        .map_err(StoreError::from)
    }

    fn costs_for_month(
        &self,
        userid: UserId,
        year: i32,
        month: u8,
    ) -> Result<Vec<CostRecord>, StoreError> {
        self.query_costs(
            "SELECT userid, description, category, sum, day, month, year FROM costs
             WHERE userid = ?1 AND year = ?2 AND month = ?3 ORDER BY id",
            &[&userid.get(), &i64::from(year), &i64::from(month)],
        )
        .map_err(StoreError::from)
    }

    fn costs_for_user(&self, userid: UserId) -> Result<Vec<CostRecord>, StoreError> {
        self.query_costs(
            "SELECT userid, description, category, sum, day, month, year FROM costs
             WHERE userid = ?1 ORDER BY id",
            &[&userid.get()],
        )
        .map_err(StoreError::from)
    }

    fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let birthday = user
            .birthday
            .map(|date| date.format(BIRTHDAY_FORMAT))
            .transpose()
            .map_err(|err| SqliteStoreError::Invalid(format!("birthday format: {err}")))?;
        self.with_connection(|connection| {
            connection.execute(
                "INSERT INTO users (id, first_name, last_name, birthday, marital_status)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    birthday = excluded.birthday,
                    marital_status = excluded.marital_status",
                params![
                    user.id.get(),
                    user.first_name,
                    user.last_name,
                    birthday,
                    user.marital_status.map(MaritalStatus::as_str),
                ],
            )?;
            Ok(())
        })
        .map_err(StoreError::from)
    }

    fn find_user(&self, userid: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.with_connection(|connection| {
            let row = connection
                .query_row(
                    "SELECT id, first_name, last_name, birthday, marital_status FROM users
                     WHERE id = ?1",
                    params![userid.get()],
                    |row| {
                        Ok(UserRow {
                            id: row.get(0)?,
                            first_name: row.get(1)?,
                            last_name: row.get(2)?,
                            birthday: row.get(3)?,
                            marital_status: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            row.map(UserRow::into_record).transpose()
        })
        .map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Raw `costs` row.
struct CostRow {
    /// Owning user id.
    userid: i64,
    /// Description text.
    description: String,
    /// Category label.
    category: String,
    /// Canonical decimal text.
    sum: String,
    /// Day of month.
    day: i64,
    /// Month of year.
    month: i64,
    /// Calendar year.
    year: i64,
}

impl CostRow {
    /// Decodes the row into a validated cost record.
    fn into_record(self) -> Result<CostRecord, SqliteStoreError> {
        let userid = UserId::from_raw(self.userid)
            .ok_or_else(|| SqliteStoreError::Corrupt(format!("negative userid {}", self.userid)))?;
        let category = Category::parse(&self.category).ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("unknown category {}", self.category))
        })?;
        let sum = self
            .sum
            .parse::<Amount>()
            .map_err(|err| SqliteStoreError::Corrupt(err.to_string()))?;
        let date = CostDate::from_parts(self.year, self.month, self.day).ok_or_else(|| {
            SqliteStoreError::Corrupt(format!(
                "invalid date {}-{}-{}",
                self.year, self.month, self.day
            ))
        })?;
        Ok(CostRecord {
            description: self.description,
            category,
            userid,
            sum,
            date,
        })
    }
}

/// Raw `users` row.
struct UserRow {
    /// User id.
    id: i64,
    /// Given name.
    first_name: String,
    /// Family name.
    last_name: String,
    /// Optional `YYYY-MM-DD` birthday.
    birthday: Option<String>,
    /// Optional marital status label.
    marital_status: Option<String>,
}

impl UserRow {
    /// Decodes the row into a validated user record.
    fn into_record(self) -> Result<UserRecord, SqliteStoreError> {
        let id = UserId::from_raw(self.id)
            .ok_or_else(|| SqliteStoreError::Corrupt(format!("negative user id {}", self.id)))?;
        let birthday = self
            .birthday
            .map(|raw| Date::parse(&raw, BIRTHDAY_FORMAT))
            .transpose()
            .map_err(|err| SqliteStoreError::Corrupt(format!("birthday: {err}")))?;
        let marital_status = self
            .marital_status
            .map(|raw| {
                MaritalStatus::parse(&raw)
                    .ok_or_else(|| SqliteStoreError::Corrupt(format!("marital status {raw}")))
            })
            .transpose()?;
        Ok(UserRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birthday,
            marital_status,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    if path
        .components()
        .any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(SqliteStoreError::Invalid(
            "store path contains an overlong component".to_string(),
        ));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies journal, sync, and busy-timeout pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

/// Initializes the schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS costs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    userid INTEGER NOT NULL,
                    description TEXT NOT NULL,
                    category TEXT NOT NULL,
                    sum TEXT NOT NULL,
                    day INTEGER NOT NULL,
                    month INTEGER NOT NULL,
                    year INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_costs_user_period
                    ON costs (userid, year, month);
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    birthday TEXT,
                    marital_status TEXT
                );",
            )?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit()?;
    Ok(())
}
