//! SQLite-backed key/value store for tracker state.
//!
//! Each tracker owns a disjoint key namespace (`streak/...`,
//! `achievements/...`, `predictions/...`) and serializes its state as a
//! serde_json blob under its keys. A missing or corrupt value reads back as
//! `None`, and the owning tracker falls back to its fresh default -- state
//! corruption never becomes a crash.

use std::rc::Rc;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

use super::data_dir;

/// Durable key/value map shared by the trackers.
///
/// Cheap to clone: clones share one underlying connection. The store is a
/// single-thread handle, matching the one-sequential-caller model of the
/// trackers themselves.
#[derive(Clone)]
pub struct Store {
    conn: Rc<Connection>,
}

impl Store {
    /// Open the store at `~/.config/skystreak/skystreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?
            .join("skystreak.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let store = Self {
            conn: Rc::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Rc::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Read and deserialize a value.
    ///
    /// Returns `None` when the key is absent or the stored JSON does not
    /// deserialize -- callers substitute their documented default.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .ok()?;
        let raw: Option<String> = stmt
            .query_row(params![key], |row| row.get(0))
            .map(Some)
            .unwrap_or(None);
        raw.and_then(|json| serde_json::from_str(&json).ok())
    }

    /// Serialize and write a value.
    ///
    /// # Errors
    /// Returns an error if serialization or the insert fails.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(value).map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Remove a key. Absent keys are a no-op.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        count: u32,
        label: String,
    }

    #[test]
    fn roundtrips_values() {
        let store = Store::open_memory().unwrap();
        assert_eq!(store.get::<Probe>("streak/state"), None);

        let probe = Probe {
            count: 7,
            label: "seven".into(),
        };
        store.put("streak/state", &probe).unwrap();
        assert_eq!(store.get::<Probe>("streak/state"), Some(probe));
    }

    #[test]
    fn corrupt_value_reads_as_none() {
        let store = Store::open_memory().unwrap();
        store.put("streak/state", &"not a probe").unwrap();
        assert_eq!(store.get::<Probe>("streak/state"), None);
    }

    #[test]
    fn clones_share_the_connection() {
        let store = Store::open_memory().unwrap();
        let other = store.clone();
        store.put("k", &1u32).unwrap();
        assert_eq!(other.get::<u32>("k"), Some(1));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = Store::open_memory().unwrap();
        store.put("k", &1u32).unwrap();
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get::<u32>("k"), None);
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skystreak.db");

        {
            let conn = Connection::open(&path).unwrap();
            let store = Store {
                conn: Rc::new(conn),
            };
            store.migrate().unwrap();
            store.put("streak/state", &41u32).unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        let store = Store {
            conn: Rc::new(conn),
        };
        store.migrate().unwrap();
        assert_eq!(store.get::<u32>("streak/state"), Some(41));
    }
}
