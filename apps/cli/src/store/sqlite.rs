//! SQLite-backed key-value store, durable across runs.
//!
//! One `kv_entries` table; the connection sits behind a mutex since
//! the session awaits every store call sequentially.

use super::KeyValueStore;
use crate::error::StoreError;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database at `path`, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open an in-memory database (for testing and `--memory` runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.conn.lock().expect("sqlite lock");
        conn.query_row(
            "SELECT value FROM kv_entries WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("sqlite lock");
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().expect("sqlite lock");
        let mut stmt =
            conn.prepare("SELECT key FROM kv_entries WHERE key LIKE ?1 || '%' ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ReviewStore;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use quiz_core::types::ReviewItem;

    #[tokio::test]
    async fn put_get_and_prefix_scan() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("rev:q1", b"a".to_vec()).await.unwrap();
        store.put("rev:q2", b"b".to_vec()).await.unwrap();
        store.put("streakDays", b"0".to_vec()).await.unwrap();

        assert_eq!(store.get("rev:q2").await.unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.get("absent").await.unwrap(), None);
        assert_eq!(
            store.keys_with_prefix("rev:").await.unwrap(),
            vec!["rev:q1".to_string(), "rev:q2".to_string()]
        );
    }

    #[tokio::test]
    async fn review_round_trip_through_sqlite() {
        let store = ReviewStore::new(SqliteStore::open_in_memory().unwrap());
        let item = ReviewItem {
            question_id: "q_n1_ab3de".to_string(),
            note_id: "n1".to_string(),
            ease: 240,
            interval_days: 3,
            due: Utc::now(),
            last_reviewed: Some(Utc::now()),
        };

        store.save_review(&item).await.unwrap();
        assert_eq!(store.get_review("q_n1_ab3de").await.unwrap().unwrap(), item);
    }
}
