//! # Verify Registry Testkit
//!
//! Testing utilities for the verify registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known selector texts and record encodings that must
//!   never drift, since the ledger matches on them literally
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A registry over a shared in-memory store, scripted
//!   identifier sources, and a fault-injecting store wrapper
//!
//! ## Golden Vectors
//!
//! ```rust
//! use verify_registry_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, actual) in verify_all_vectors() {
//!     assert!(ok, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use verify_registry_testkit::generators::{AdminParams, admin_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn admin_roundtrip(params: AdminParams) {
//!         let admin = admin_from_params(&params);
//!         let decoded = verify_registry::Admin::decode(&admin.encode().unwrap()).unwrap();
//!         prop_assert_eq!(decoded, admin);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use verify_registry_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! assert!(fixture.store.is_empty().unwrap());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{parse_results, FaultyStore, Faults, ScriptedIdentifiers, TestFixture};
pub use generators::{admin_from_params, AdminParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
