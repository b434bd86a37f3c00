//! SQLite-based package metadata cache
//!
//! One row per `put`: (name, data, updated_at). A read refreshes the hit
//! entry's `updated_at` and then enforces the configured entry cap by
//! deleting everything outside the most-recently-updated names. Both
//! behaviors run on every read so recency ordering is deterministic.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::packagist::error::CacheError;

pub struct MetadataCache {
    conn: Mutex<Option<Connection>>,
    db_path: PathBuf,
    max_entries: AtomicI64,
}

impl MetadataCache {
    pub fn new(db_path: &Path, max_entries: i64) -> Result<Self, CacheError> {
        info!("Initializing cache database at {:?}", db_path);

        let cache = Self {
            conn: Mutex::new(None),
            db_path: db_path.to_path_buf(),
            max_entries: AtomicI64::new(max_entries),
        };

        // Open eagerly so setup errors surface at startup
        {
            let mut guard = cache
                .conn
                .lock()
                .map_err(|_| CacheError::LockPoisoned)?;
            Self::ensure_open(&mut guard, &cache.db_path)?;
        }

        info!("Cache initialized successfully");
        Ok(cache)
    }

    /// Update the entry cap. Zero or a negative value disables eviction.
    pub fn set_max_entries(&self, max_entries: i64) {
        self.max_entries.store(max_entries, Ordering::Relaxed);
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Hand out the connection, reopening it first when `clear_all`
    /// dropped it.
    fn ensure_open<'a>(
        guard: &'a mut Option<Connection>,
        db_path: &Path,
    ) -> Result<&'a Connection, CacheError> {
        let conn = match guard.take() {
            Some(conn) => conn,
            None => Self::open_connection(db_path)?,
        };
        Ok(guard.insert(conn))
    }

    /// Open the database and create the schema
    fn open_connection(db_path: &Path) -> Result<Connection, CacheError> {
        debug!("Opening cache database at {:?}", db_path);
        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS packages (
                name TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_packages_updated_at ON packages(updated_at)",
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(conn)
    }

    /// Look up a package by exact name. A hit refreshes the entry's
    /// recency; eviction runs on every read. Duplicate rows for the same
    /// name are tolerated and the first inserted row wins.
    pub fn get(&self, name: &str) -> Result<Option<String>, CacheError> {
        let mut guard = self.conn.lock().map_err(|_| CacheError::LockPoisoned)?;
        let conn = Self::ensure_open(&mut guard, &self.db_path)?;

        let data = match conn.query_row(
            "SELECT data FROM packages WHERE name = ?1 ORDER BY rowid LIMIT 1",
            [name],
            |row| row.get::<_, String>(0),
        ) {
            Ok(data) => Some(data),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        if data.is_some() {
            conn.execute(
                "UPDATE packages SET updated_at = ?1 WHERE name = ?2",
                (Self::current_timestamp_ms(), name),
            )?;
        }

        Self::evict(conn, self.max_entries.load(Ordering::Relaxed))?;

        Ok(data)
    }

    /// Insert a new entry with the current timestamp. No deduplication:
    /// repeated puts for the same name add rows.
    pub fn put(&self, name: &str, data: &str) -> Result<(), CacheError> {
        let mut guard = self.conn.lock().map_err(|_| CacheError::LockPoisoned)?;
        let conn = Self::ensure_open(&mut guard, &self.db_path)?;

        conn.execute(
            "INSERT INTO packages (name, data, updated_at) VALUES (?1, ?2, ?3)",
            (name, data, Self::current_timestamp_ms()),
        )?;

        debug!("Cached metadata for package {}", name);
        Ok(())
    }

    /// Number of rows currently in the store
    pub fn entry_count(&self) -> Result<i64, CacheError> {
        let mut guard = self.conn.lock().map_err(|_| CacheError::LockPoisoned)?;
        let conn = Self::ensure_open(&mut guard, &self.db_path)?;

        let count = conn.query_row("SELECT count(*) FROM packages", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Destroy the persisted store: close the connection and delete the
    /// backing file. The next operation recreates the store from empty.
    pub fn clear_all(&self) -> Result<(), CacheError> {
        let mut guard = self.conn.lock().map_err(|_| CacheError::LockPoisoned)?;

        if let Some(conn) = guard.take() {
            drop(conn);
        }

        info!("Deleting cache database at {:?}", self.db_path);
        Self::remove_if_exists(&self.db_path)?;

        // WAL mode leaves sidecar files next to the database
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.db_path.clone().into_os_string();
            sidecar.push(suffix);
            Self::remove_if_exists(Path::new(&sidecar))?;
        }

        Ok(())
    }

    fn remove_if_exists(path: &Path) -> Result<(), CacheError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop every row whose name is not among the `max_entries`
    /// most-recently-updated names. A non-positive cap disables eviction.
    fn evict(conn: &Connection, max_entries: i64) -> Result<(), CacheError> {
        if max_entries <= 0 {
            return Ok(());
        }

        let count: i64 = conn.query_row("SELECT count(*) FROM packages", [], |row| row.get(0))?;
        if count <= max_entries {
            return Ok(());
        }

        let evicted = conn.execute(
            r#"
            DELETE FROM packages WHERE name NOT IN (
                SELECT name FROM packages ORDER BY updated_at DESC LIMIT ?1
            )
            "#,
            [max_entries],
        )?;

        debug!("Evicted {} cache entries (cap {})", evicted, max_entries);
        Ok(())
    }
}
