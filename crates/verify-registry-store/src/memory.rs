//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;

use verify_registry_core::SelectorQuery;

use crate::error::{Result, StoreError};
use crate::iterator::{KeyValue, ScopedIterator, VecResultsIterator};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
/// Queries snapshot their matches when the cursor is created.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// All stored keys in ascending order.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Bytes>>> {
        self.state
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Bytes>>> {
        self.state
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        self.write()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_query_result(&self, query: &str) -> Result<ScopedIterator> {
        let selector =
            SelectorQuery::parse(query).map_err(|e| StoreError::InvalidSelector(e.to_string()))?;

        let matches: Vec<KeyValue> = self
            .read()?
            .iter()
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect();

        Ok(ScopedIterator::wrap(VecResultsIterator::new(matches)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;

    const ALL_DOCS: &str = r#"{"selector":{"Type":"Document"}}"#;

    fn doc(hash: &str, body: &str) -> Bytes {
        Bytes::from(format!(
            r#"{{"Type":"Document","document":"{}","hash":"{}"}}"#,
            body, hash
        ))
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert_eq!(store.get_state("a").await.unwrap(), None);

        store.put_state("a", doc("a", "one")).await.unwrap();
        assert_eq!(store.get_state("a").await.unwrap(), Some(doc("a", "one")));
        assert!(store.contains_key("a").await.unwrap());
        assert!(!store.contains_key("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.put_state("a", doc("a", "one")).await.unwrap();
        store.put_state("a", doc("a", "two")).await.unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get_state("a").await.unwrap(), Some(doc("a", "two")));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders_by_key() {
        let store = MemoryStore::new();
        store.put_state("c", doc("c", "3")).await.unwrap();
        store.put_state("a", doc("a", "1")).await.unwrap();
        store
            .put_state("admin", Bytes::from_static(br#"{"Type":"admin"}"#))
            .await
            .unwrap();
        store.put_state("b", doc("b", "2")).await.unwrap();
        store.put_state("raw", Bytes::from_static(b"opaque")).await.unwrap();

        let keys: Vec<String> = store
            .collect_query(ALL_DOCS)
            .await
            .unwrap()
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_query_empty_store() {
        let store = MemoryStore::new();
        assert!(store.collect_query(ALL_DOCS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_rejects_malformed_selector() {
        let store = MemoryStore::new();
        let result = store.get_query_result("Type == Document").await;
        assert!(matches!(result, Err(StoreError::InvalidSelector(_))));
    }

    #[tokio::test]
    async fn test_query_snapshot_ignores_later_writes() {
        let store = MemoryStore::new();
        store.put_state("a", doc("a", "1")).await.unwrap();
        let mut results = store.get_query_result(ALL_DOCS).await.unwrap();
        store.put_state("b", doc("b", "2")).await.unwrap();

        assert_eq!(results.next().await.unwrap().unwrap().key, "a");
        assert!(results.next().await.unwrap().is_none());
        results.close().unwrap();
    }
}
