#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT DEFAULT (datetime('now'))
);
";

/// A single write in a batch applied through [`Store::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Put(String, String),
    Remove(String),
}

/// String-keyed persistence for JSON-encoded values.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply all writes as one logical operation.
    fn apply(&self, writes: &[StoreOp]) -> Result<()>;

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.apply(&[StoreOp::Put(key.to_string(), value.to_string())])
    }

    #[cfg(test)]
    fn remove(&self, key: &str) -> Result<()> {
        self.apply(&[StoreOp::Remove(key.to_string())])
    }
}

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and initialize if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        log::debug!("get {key}: {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    fn apply(&self, writes: &[StoreOp]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for write in writes {
            match write {
                StoreOp::Put(key, value) => {
                    tx.execute(
                        "INSERT INTO kv (key, value) VALUES (?1, ?2) \
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                        rusqlite::params![key, value],
                    )?;
                }
                StoreOp::Remove(key) => {
                    tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
                }
            }
        }
        tx.commit()?;
        log::debug!("applied {} write(s)", writes.len());
        Ok(())
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn apply(&self, writes: &[StoreOp]) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        for write in writes {
            match write {
                StoreOp::Put(key, value) => {
                    entries.insert(key.clone(), value.clone());
                }
                StoreOp::Remove(key) => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
