/// SQLite-backed response log.
///
/// Each log is one JSON array stored under a fixed key in a `kv` table, so a
/// database written by one process can be read back as-is by the next.
use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use icebot_core::{FeedbackEntry, IcebotError, ResponseLog};

use crate::response_log::{push_bounded, LogCaps};

pub const FEEDBACK_KEY: &str = "icebot_feedback";
pub const USED_RESPONSES_KEY: &str = "icebot_used_responses";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);";

pub struct SqliteResponseLog {
    conn: Mutex<Connection>,
    caps: LogCaps,
}

fn storage_err(e: impl std::fmt::Display) -> IcebotError {
    IcebotError::Storage(e.to_string())
}

impl SqliteResponseLog {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>, caps: LogCaps) -> Result<Self, IcebotError> {
        let conn = Connection::open(path.as_ref()).map_err(storage_err)?;
        conn.execute_batch(&format!("PRAGMA journal_mode=WAL;\n{SCHEMA}"))
            .map_err(storage_err)?;

        info!("SqliteResponseLog opened at {:?}", path.as_ref());
        Ok(Self {
            conn: Mutex::new(conn),
            caps,
        })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory(caps: LogCaps) -> Result<Self, IcebotError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        conn.execute_batch(SCHEMA).map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
            caps,
        })
    }

    /// Read the array under `key`. A missing or unreadable value is an empty log.
    fn load(conn: &Connection, key: &str) -> Result<VecDeque<Value>, IcebotError> {
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_err)?;

        Ok(match raw.map(|r| serde_json::from_str::<Vec<Value>>(&r)) {
            Some(Ok(items)) => items.into(),
            Some(Err(e)) => {
                debug!(key, error = %e, "Discarding corrupt log value");
                VecDeque::new()
            }
            None => VecDeque::new(),
        })
    }

    fn store(conn: &Connection, key: &str, items: &VecDeque<Value>) -> Result<(), IcebotError> {
        let json = serde_json::to_string(items).map_err(storage_err)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, json],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    async fn append(&self, key: &str, item: Value, cap: usize) -> Result<(), IcebotError> {
        let conn = self.conn.lock().await;
        let mut items = Self::load(&conn, key)?;
        push_bounded(&mut items, item, cap);
        Self::store(&conn, key, &items)
    }
}

#[async_trait]
impl ResponseLog for SqliteResponseLog {
    async fn record_feedback(&self, entry: FeedbackEntry) -> Result<(), IcebotError> {
        let item = serde_json::to_value(&entry).map_err(storage_err)?;
        self.append(FEEDBACK_KEY, item, self.caps.feedback).await
    }

    async fn record_used_response(&self, response: &str) -> Result<(), IcebotError> {
        self.append(
            USED_RESPONSES_KEY,
            Value::String(response.to_string()),
            self.caps.used_responses,
        )
        .await
    }

    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, IcebotError> {
        let conn = self.conn.lock().await;
        // Entries that no longer decode are skipped rather than failing the read.
        Ok(Self::load(&conn, FEEDBACK_KEY)?
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    async fn used_responses(&self) -> Result<Vec<String>, IcebotError> {
        let conn = self.conn.lock().await;
        Ok(Self::load(&conn, USED_RESPONSES_KEY)?
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect())
    }
}
