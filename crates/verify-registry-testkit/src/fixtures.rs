//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use verify_registry::{Registry, RegistryConfig};
use verify_registry_core::{Identifier, IdentifierSource};
use verify_registry_store::{
    KeyValue, MemoryStore, Result as StoreResult, ResultsIterator, ScopedIterator, Store,
    StoreError,
};

/// Seed used by fixtures so identifier sequences are reproducible.
pub const FIXTURE_SEED: u64 = 0x5eed;

/// A registry over an in-memory store the test can inspect directly.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub registry: Registry<Arc<MemoryStore>>,
}

impl TestFixture {
    /// Create a fixture with a seeded random identifier source.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let registry = Registry::new(
            Arc::clone(&store),
            RegistryConfig {
                seed: Some(FIXTURE_SEED),
                ..RegistryConfig::default()
            },
        );
        Self { store, registry }
    }

    /// Create a fixture whose document identifiers come from `source`.
    pub fn with_identifiers(source: impl IdentifierSource + 'static) -> Self {
        let store = Arc::new(MemoryStore::new());
        let registry = Registry::with_identifier_source(
            Arc::clone(&store),
            source,
            RegistryConfig::default(),
        );
        Self { store, registry }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a serialized query result into `(Key, Record)` pairs.
///
/// Panics if the payload is not the expected array shape.
pub fn parse_results(payload: &[u8]) -> Vec<(String, serde_json::Value)> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).expect("query payload is not JSON");
    value
        .as_array()
        .expect("query payload is not an array")
        .iter()
        .map(|entry| {
            let key = entry["Key"].as_str().expect("entry without Key").to_string();
            (key, entry["Record"].clone())
        })
        .collect()
}

/// Hands out identifiers from a fixed list, cycling when it runs out.
pub struct ScriptedIdentifiers {
    script: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedIdentifiers {
    pub fn new<I, T>(script: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let script: Vec<String> = script.into_iter().map(Into::into).collect();
        assert!(!script.is_empty(), "identifier script must not be empty");
        Self {
            script,
            next: AtomicUsize::new(0),
        }
    }
}

impl IdentifierSource for ScriptedIdentifiers {
    fn generate(&self, _content: &str) -> Identifier {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        Identifier::new(self.script[i % self.script.len()].clone())
    }
}

/// Which store calls should fail.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub fail_get: bool,
    pub fail_put: bool,
    pub fail_query: bool,
    /// Fail `next` once this many results have been yielded.
    pub fail_after: Option<usize>,
    pub fail_close: bool,
}

/// Wraps a store and injects failures, counting writes and cursor closes.
pub struct FaultyStore<S> {
    inner: S,
    faults: Mutex<Faults>,
    puts: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl<S: Store> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Mutex::new(Faults::default()),
            puts: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the active faults.
    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = faults;
    }

    fn faults(&self) -> Faults {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Successful writes so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Cursor closes so far.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

fn injected(call: &str) -> StoreError {
    StoreError::Unavailable(format!("injected {} failure", call))
}

#[async_trait]
impl<S: Store> Store for FaultyStore<S> {
    async fn get_state(&self, key: &str) -> StoreResult<Option<Bytes>> {
        if self.faults().fail_get {
            return Err(injected("get"));
        }
        self.inner.get_state(key).await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> StoreResult<()> {
        if self.faults().fail_put {
            return Err(injected("put"));
        }
        self.inner.put_state(key, value).await?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_query_result(&self, query: &str) -> StoreResult<ScopedIterator> {
        let faults = self.faults();
        if faults.fail_query {
            return Err(injected("query"));
        }
        let inner = self.inner.get_query_result(query).await?;
        Ok(ScopedIterator::wrap(FaultyIterator {
            inner: Some(inner),
            yielded: 0,
            fail_after: faults.fail_after,
            fail_close: faults.fail_close,
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct FaultyIterator {
    inner: Option<ScopedIterator>,
    yielded: usize,
    fail_after: Option<usize>,
    fail_close: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl ResultsIterator for FaultyIterator {
    async fn next(&mut self) -> StoreResult<Option<KeyValue>> {
        if self.fail_after == Some(self.yielded) {
            return Err(injected("iteration"));
        }
        let inner = self.inner.as_mut().ok_or(StoreError::IteratorClosed)?;
        let item = inner.next().await?;
        if item.is_some() {
            self.yielded += 1;
        }
        Ok(item)
    }

    fn close(&mut self) -> StoreResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(inner) = self.inner.take() {
            inner.close()?;
        }
        if self.fail_close {
            return Err(injected("close"));
        }
        Ok(())
    }
}
