//! Store trait: the abstract interface to the key-value ledger.
//!
//! The registry is storage-agnostic. Implementations include SQLite
//! (persistent) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::iterator::{KeyValue, ScopedIterator};

/// The Store trait: async interface to the ledger's world state.
///
/// # Design Notes
///
/// - **Flat keyspace**: every record type shares one keyspace. Records are
///   partitioned logically by their `Type` field, not by table.
/// - **Whole values**: there is no partial update; `put_state` replaces the
///   value at a key.
/// - **Query order**: results come back in the backend's native order
///   (ascending key for the bundled backends).
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value at `key`, or `None` if absent.
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write `value` at `key`, replacing any previous value.
    async fn put_state(&self, key: &str, value: Bytes) -> Result<()>;

    /// Run a rich query.
    ///
    /// `query` is selector text of the form `{"selector":{...}}`. The returned
    /// cursor is closed when it goes out of scope.
    async fn get_query_result(&self, query: &str) -> Result<ScopedIterator>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).put_state(key, value).await
    }

    async fn get_query_result(&self, query: &str) -> Result<ScopedIterator> {
        (**self).get_query_result(query).await
    }
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Whether any value is stored at `key`.
    fn contains_key(&self, key: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Run a query and drain every result, closing the cursor.
    fn collect_query(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<KeyValue>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_state(key).await?.is_some())
    }

    async fn collect_query(&self, query: &str) -> Result<Vec<KeyValue>> {
        let mut results = self.get_query_result(query).await?;
        let mut out = Vec::new();
        while let Some(kv) = results.next().await? {
            out.push(kv);
        }
        results.close()?;
        Ok(out)
    }
}
