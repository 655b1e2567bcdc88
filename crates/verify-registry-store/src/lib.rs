//! # Verify Registry Store
//!
//! Storage abstraction for the verify registry. The ledger is modelled as a
//! flat key-value store with point reads, point writes, and selector queries.
//!
//! ## Overview
//!
//! The registry only talks to storage through the [`Store`] trait, so the
//! ledger backend is swappable. [`SqliteStore`] persists to disk, and
//! [`MemoryStore`] is used for tests.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for get / put / query
//! - [`ResultsIterator`] - A backend's cursor over query results
//! - [`ScopedIterator`] - Owns a cursor and closes it exactly once
//! - [`KeyValue`] - One query result
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use verify_registry_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     store.put_state("k", Bytes::from_static(br#"{"Type":"Document"}"#)).await.unwrap();
//!
//!     let mut results = store
//!         .get_query_result(r#"{"selector":{"Type":"Document"}}"#)
//!         .await
//!         .unwrap();
//!     while let Some(kv) = results.next().await.unwrap() {
//!         println!("{}", kv.key);
//!     }
//!     results.close().unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Key order**: both backends return query results in ascending key order.
//! - **Scoped cursors**: a [`ScopedIterator`] closes its cursor on drop if the
//!   caller did not, so every exit path releases it.
//! - **No atomic check-and-set**: a get followed by a put is two calls.
//!   Arbitrating concurrent writers is the ledger's job.

pub mod error;
pub mod iterator;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use iterator::{KeyValue, ResultsIterator, ScopedIterator, VecResultsIterator};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
pub use traits::{Store, StoreExt};
