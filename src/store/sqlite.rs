/*!
 * SQLite storage backend.
 *
 * Values live in the `kv_store` table. `modify` runs inside an immediate
 * transaction, so a read-modify-write of the session blob cannot lose an
 * update made by another process sharing the same database file.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::database::DatabaseConnection;

use super::{ModifyFn, StorageBackend};

/// Durable key/value storage in a SQLite database
#[derive(Clone)]
pub struct SqliteBackend {
    db: DatabaseConnection,
}

impl SqliteBackend {
    /// Wrap an existing connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new(path)?))
    }

    /// Open the database at the default location
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_default()?))
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_in_memory()?))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn read_sync(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_sync(conn: &Connection, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, now],
        )?;
        Ok(())
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.db.execute(|conn| Self::read_sync(conn, key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db.execute(|conn| Self::write_sync(conn, key, value))
    }

    fn modify(&self, key: &str, f: &mut ModifyFn<'_>) -> Result<()> {
        self.db.transaction(|tx| {
            let current = Self::read_sync(tx, key)?;
            if let Some(next) = f(current)? {
                Self::write_sync(tx, key, &next)?;
            }
            Ok(())
        })
    }

    fn close(&mut self) -> Result<()> {
        if self.db.is_in_memory() {
            return Ok(());
        }
        debug!("Checkpointing database at {:?}", self.db.path());
        self.db.execute(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
    }
}
