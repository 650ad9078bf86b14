use crate::error::{PulseError, Result};
use crate::model::{Mode, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub const RECENT_LIMIT: usize = 8;
const LAST_MODE_KEY: &str = "last_mode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRepo {
    pub repo_path: String,
    pub last_opened_at: DateTime<Utc>,
}

/// Recently analyzed repositories and the last used mode. Analytics are
/// recomputed every run and never stored here.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the database at `db_path`, or `<data dir>/devrhythm/state.db`.
    pub fn open<P: AsRef<Path>>(db_path: Option<P>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p.as_ref().to_path_buf(),
            None => default_db_path()?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("opening state database {}", path.display());
        let conn = Connection::open(&path)?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS recent_repos (
                repo_path TEXT PRIMARY KEY,
                last_opened_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_recent_opened ON recent_repos(last_opened_at);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(PulseError::Store(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    pub fn touch_repo(&self, repo_path: &str) -> Result<()> {
        self.touch_repo_at(repo_path, Utc::now())
    }

    pub fn touch_repo_at(&self, repo_path: &str, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO recent_repos (repo_path, last_opened_at) VALUES (?1, ?2)
             ON CONFLICT(repo_path) DO UPDATE SET last_opened_at = excluded.last_opened_at",
            params![repo_path, at.timestamp_millis()],
        )?;
        Ok(())
    }

    /// Newest first.
    pub fn recent_repos(&self, limit: usize) -> Result<Vec<RecentRepo>> {
        let mut stmt = self.conn.prepare(
            "SELECT repo_path, last_opened_at FROM recent_repos
             ORDER BY last_opened_at DESC, repo_path ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let ms: i64 = row.get(1)?;
            let last_opened_at = DateTime::from_timestamp_millis(ms).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    1,
                    "last_opened_at".to_string(),
                    rusqlite::types::Type::Integer,
                )
            })?;
            Ok(RecentRepo {
                repo_path: row.get(0)?,
                last_opened_at,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn set_last_mode(&self, mode: Mode) -> Result<()> {
        self.conn.execute(
            "INSERT INTO app_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_MODE_KEY, mode.as_str()],
        )?;
        Ok(())
    }

    /// Defaults to [`Mode::Local`] when unset or unreadable.
    pub fn last_mode(&self) -> Result<Mode> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![LAST_MODE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value
            .and_then(|v| match v.parse::<Mode>() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    log::warn!("ignoring stored mode: {e}");
                    None
                }
            })
            .unwrap_or(Mode::Local))
    }
}

fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| PulseError::Store("Could not determine a data directory".to_string()))?;
    Ok(data_dir.join("devrhythm").join("state.db"))
}
