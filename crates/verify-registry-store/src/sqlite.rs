//! SQLite implementation of the Store trait.
//!
//! This is the persistent backend. It uses rusqlite with bundled SQLite.
//! Query cursors page through `world_state` in key order and filter each
//! page with the selector, so large result sets are never loaded at once.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use verify_registry_core::SelectorQuery;

use crate::error::{Result, StoreError};
use crate::iterator::{KeyValue, ResultsIterator, ScopedIterator};
use crate::migration::{self, now_millis};
use crate::traits::Store;

/// Tuning for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Rows fetched per round trip while iterating a query.
    pub page_size: usize,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self { page_size: 64 }
    }
}

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    config: SqliteConfig,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            config: SqliteConfig::default(),
        }
    }

    /// Replace the tuning parameters.
    pub fn with_config(mut self, config: SqliteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn)
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        self.with_conn(|conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM world_state WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.map(Bytes::from))
        })
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO world_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value.as_ref(), now_millis()],
            )?;
            Ok(())
        })
    }

    async fn get_query_result(&self, query: &str) -> Result<ScopedIterator> {
        let selector =
            SelectorQuery::parse(query).map_err(|e| StoreError::InvalidSelector(e.to_string()))?;
        tracing::debug!(
            conditions = selector.conditions().len(),
            page_size = self.config.page_size,
            "opening sqlite query cursor"
        );

        Ok(ScopedIterator::wrap(SqliteResultsIterator {
            conn: Arc::clone(&self.conn),
            selector,
            page_size: self.config.page_size.max(1),
            last_key: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }))
    }
}

/// Paging cursor over `world_state`.
struct SqliteResultsIterator {
    conn: Arc<Mutex<Connection>>,
    selector: SelectorQuery,
    page_size: usize,
    /// Last key read from the table, matched or not.
    last_key: Option<String>,
    buffer: VecDeque<KeyValue>,
    exhausted: bool,
}

impl SqliteResultsIterator {
    /// Fetch the next page of rows and keep the ones the selector matches.
    fn fetch_page(&mut self) -> Result<()> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare_cached(
            "SELECT key, value FROM world_state
             WHERE ?1 IS NULL OR key > ?1
             ORDER BY key
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![self.last_key, self.page_size as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.len() < self.page_size {
            self.exhausted = true;
        }
        if let Some((key, _)) = rows.last() {
            self.last_key = Some(key.clone());
        }

        self.buffer.extend(
            rows.into_iter()
                .filter(|(_, value)| self.selector.matches(value))
                .map(|(key, value)| KeyValue::new(key, value)),
        );
        Ok(())
    }
}

#[async_trait]
impl ResultsIterator for SqliteResultsIterator {
    async fn next(&mut self) -> Result<Option<KeyValue>> {
        loop {
            if let Some(kv) = self.buffer.pop_front() {
                return Ok(Some(kv));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page()?;
        }
    }

    fn close(&mut self) -> Result<()> {
        self.buffer.clear();
        self.exhausted = true;
        Ok(())
    }
}
