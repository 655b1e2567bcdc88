//! # Verify Registry Core
//!
//! Pure primitives for the verify registry: record types, identifier
//! generation, and selector construction and evaluation.
//!
//! This crate contains no I/O and no storage. Everything here is computation
//! over record values and query text.
//!
//! ## Key Types
//!
//! - [`Document`] - A stored document, keyed by its generated [`Identifier`]
//! - [`Admin`] - An administrator with an append-only message log
//! - [`IdentifierSource`] - Produces storage keys for new documents
//! - [`Selector`] - Escaped equality query over one record type
//! - [`SelectorQuery`] - Parsed selector used by stores to filter records
//!
//! ## Record Encoding
//!
//! Records are stored as JSON using the ledger's wire field names. See the
//! [`record`] module.

pub mod error;
pub mod identifier;
pub mod record;
pub mod selector;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use identifier::{
    ContentDigest, IdentifierSource, RandomIdentifiers, IDENTIFIER_ALPHABET, IDENTIFIER_LENGTH,
};
pub use record::{fields, Admin, Document};
pub use selector::{Predicate, Selector, SelectorQuery, MAX_EXTRA_PREDICATES};
pub use types::{AdminId, Identifier, RecordType};
pub use validation::{require_non_empty, validate_selector_value, DEFAULT_MAX_VALUE_LEN};
