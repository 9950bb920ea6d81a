use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use super::data::{Record, RecordKey};
use crate::error::StoreError;

/// The RecordStore keeps the site records in a local SQLite file.
///
/// It is a plain key-value table: each key holds one JSON document.
/// Writes to different keys are independent; there is no cross-key
/// transaction. Handles are cheap to clone and share one connection.
#[derive(Clone)]
pub struct RecordStore {
    conn: Arc<Mutex<Option<Connection>>>,
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl RecordStore {
    /// Create a handle for the database at `db_path`.
    /// Nothing is opened until [`RecordStore::init`] runs.
    pub fn new(db_path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path: db_path.into(),
            busy_timeout,
        }
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Open the database and make sure its table exists.
    ///
    /// Calling it again after a success does nothing.
    pub async fn init(&self) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        let db_path = self.db_path.clone();
        let busy_timeout = self.busy_timeout;

        run_blocking(move || {
            let mut slot = conn.lock().map_err(|_| StoreError::Init {
                path: db_path.display().to_string(),
                message: "connection lock poisoned".to_string(),
            })?;
            if slot.is_some() {
                return Ok(());
            }

            let opened = open_database(&db_path, busy_timeout).map_err(|message| StoreError::Init {
                path: db_path.display().to_string(),
                message,
            })?;
            info!("📁 Archive initialized at: {}", db_path.display());
            *slot = Some(opened);
            Ok(())
        })
        .await
    }

    /// Read the value stored under `key`. `None` means it was never written.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        run_blocking(move || {
            let slot = conn
                .lock()
                .map_err(|_| StoreError::ReadNotInitialized { key: key.clone() })?;
            let conn = slot
                .as_ref()
                .ok_or_else(|| StoreError::ReadNotInitialized { key: key.clone() })?;

            let raw: Option<String> = conn
                .query_row("SELECT value FROM site_data WHERE key = ?1", [&key], |row| row.get(0))
                .optional()
                .map_err(|source| StoreError::Read { key: key.clone(), source })?;

            match raw {
                Some(json) => serde_json::from_str(&json)
                    .map(Some)
                    .map_err(|source| StoreError::Decode { key, source }),
                None => Ok(None),
            }
        })
        .await
    }

    /// Insert or replace the value stored under `key`
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        run_blocking(move || {
            let slot = conn
                .lock()
                .map_err(|_| StoreError::WriteNotInitialized { key: key.clone() })?;
            let conn = slot
                .as_ref()
                .ok_or_else(|| StoreError::WriteNotInitialized { key: key.clone() })?;

            conn.execute(
                "INSERT INTO site_data (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![&key, &json, Utc::now().timestamp()],
            )
            .map_err(|source| StoreError::Write { key: key.clone(), source })?;

            debug!("💾 Saved '{}' ({} bytes)", key, json.len());
            Ok(())
        })
        .await
    }

    /// Read one of the three site records
    pub async fn load(&self, key: RecordKey) -> Result<Option<Record>, StoreError> {
        let record = match key {
            RecordKey::Portfolio => self.get(key.as_str()).await?.map(Record::Portfolio),
            RecordKey::About => self.get(key.as_str()).await?.map(Record::About),
            RecordKey::Config => self.get(key.as_str()).await?.map(Record::Config),
        };
        Ok(record)
    }

    /// Write one of the three site records under its own key
    pub async fn save(&self, record: &Record) -> Result<(), StoreError> {
        let key = record.key();
        match record {
            Record::Portfolio(items) => self.set(key.as_str(), items).await,
            Record::About(about) => self.set(key.as_str(), about).await,
            Record::Config(config) => self.set(key.as_str(), config).await,
        }
    }
}

/// Open (or create) the database file and its table
fn open_database(db_path: &Path, busy_timeout: Duration) -> Result<Connection, String> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("could not create {}: {}", parent.display(), e))?;
        }
    }

    let conn = Connection::open(db_path).map_err(|e| e.to_string())?;
    conn.busy_timeout(busy_timeout).map_err(|e| e.to_string())?;

    // One table, one JSON document per key
    conn.execute(
        "CREATE TABLE IF NOT EXISTS site_data (
            key             TEXT PRIMARY KEY,
            value           TEXT NOT NULL,
            updated_at      INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn)
}

/// rusqlite is blocking, so every query goes through the blocking pool
async fn run_blocking<T, F>(job: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StoreError::Worker { message: e.to_string() })?
}

// Implement Debug for better error messages
impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}
