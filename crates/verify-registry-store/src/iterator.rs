//! Query result cursors.
//!
//! Backends implement [`ResultsIterator`]. Callers only ever see it wrapped in
//! a [`ScopedIterator`], which guarantees the cursor is closed exactly once:
//! explicitly through [`ScopedIterator::close`], or on drop otherwise.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StoreError};

/// One query result: the stored key and the stored value, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Bytes,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A backend cursor over query results.
///
/// `next` may perform I/O and fail part way through a result set.
#[async_trait]
pub trait ResultsIterator: Send {
    /// The next result, or `None` once the result set is exhausted.
    async fn next(&mut self) -> Result<Option<KeyValue>>;

    /// Release the cursor. [`ScopedIterator`] calls this exactly once.
    fn close(&mut self) -> Result<()>;
}

/// Owns a cursor for the duration of a scope.
pub struct ScopedIterator {
    inner: Option<Box<dyn ResultsIterator>>,
}

impl ScopedIterator {
    pub fn new(inner: Box<dyn ResultsIterator>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Wrap a concrete cursor.
    pub fn wrap<I: ResultsIterator + 'static>(inner: I) -> Self {
        Self::new(Box::new(inner))
    }

    pub async fn next(&mut self) -> Result<Option<KeyValue>> {
        match self.inner.as_mut() {
            Some(inner) => inner.next().await,
            None => Err(StoreError::IteratorClosed),
        }
    }

    /// Close now and report the outcome.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScopedIterator {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to close query iterator");
        }
    }
}

/// A cursor over results already materialized in memory.
pub struct VecResultsIterator {
    items: std::collections::VecDeque<KeyValue>,
}

impl VecResultsIterator {
    pub fn new(items: impl IntoIterator<Item = KeyValue>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ResultsIterator for VecResultsIterator {
    async fn next(&mut self) -> Result<Option<KeyValue>> {
        Ok(self.items.pop_front())
    }

    fn close(&mut self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}
