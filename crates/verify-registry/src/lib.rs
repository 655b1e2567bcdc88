//! # Verify Registry
//!
//! A registry of documents and administrators kept in a key-value ledger,
//! with equality-based rich queries over both.
//!
//! ## Overview
//!
//! - **Documents**: created once under a generated identifier, never mutated
//! - **Admins**: created once under a caller-chosen ID; their message log is
//!   append-only
//! - **Queries**: escaped equality selectors, serialized into one JSON array
//!   of `{"Key", "Record"}` entries
//! - **Dispatch**: named operations with positional string arguments
//!
//! ## Usage
//!
//! ```rust,no_run
//! use verify_registry::{Registry, RegistryConfig};
//! use verify_registry::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     let registry = Registry::new(store, RegistryConfig::default());
//!
//!     let identifier = registry.add_document("signed contract").await.unwrap();
//!     let json = registry
//!         .get_document_by_identifier(identifier.as_str())
//!         .await
//!         .unwrap();
//!     println!("{}", String::from_utf8_lossy(&json));
//!
//!     registry.add_admin("a1", "alice", "pw", "hello").await.unwrap();
//!     registry.invoke("updateAdmin", &["a1", "second"]).await.unwrap();
//! }
//! ```
//!
//! ## Known Gaps
//!
//! - Admin passwords are stored and matched in plaintext.
//! - Document identifiers are random tokens, not content digests, unless
//!   [`IdentifierStrategy::ContentDigest`] is configured.
//! - Create operations check existence and write in two store calls; racing
//!   creators are arbitrated by the ledger.
//!
//! ## Re-exports
//!
//! - `verify_registry::core` - Records, identifiers, selectors
//! - `verify_registry::store` - Storage abstraction, SQLite and memory stores

pub mod admins;
pub mod dispatch;
pub mod documents;
pub mod error;
pub mod registry;
pub mod serializer;

// Re-export component crates
pub use verify_registry_core as core;
pub use verify_registry_store as store;

// Re-export main types for convenience
pub use dispatch::Operation;
pub use error::{RegistryError, Result};
pub use registry::{IdentifierStrategy, Registry, RegistryConfig};
pub use serializer::serialize_results;

// Re-export commonly used core types
pub use verify_registry_core::{Admin, AdminId, Document, Identifier, IdentifierSource, RecordType};
