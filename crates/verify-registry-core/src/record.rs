//! Document and admin records and their JSON encoding.
//!
//! Records are persisted as JSON objects using the ledger's wire field
//! names (see [`fields`]). Selectors match on those names literally, so they
//! must never change.
//!
//! Every record carries a `Type` tag. Decoding checks the tag, so an admin
//! record is never mistaken for a document even though both live in the same
//! keyspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AdminId, Identifier, RecordType};

/// Wire field names.
pub mod fields {
    pub const TYPE: &str = "Type";
    pub const DOCUMENT: &str = "document";
    pub const HASH: &str = "hash";
    pub const ADMIN_ID: &str = "adminID";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const MESSAGE: &str = "message";
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Storage key, written to the `hash` field.
    pub identifier: Identifier,
    /// Document body, written to the `document` field.
    pub content: String,
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    #[serde(rename = "Type")]
    record_type: &'static str,
    document: &'a str,
    hash: &'a str,
}

#[derive(Deserialize)]
struct DocumentIn {
    #[serde(rename = "Type")]
    record_type: String,
    document: String,
    hash: String,
}

impl Document {
    pub fn new(identifier: Identifier, content: impl Into<String>) -> Self {
        Self {
            identifier,
            content: content.into(),
        }
    }

    pub const fn record_type(&self) -> RecordType {
        RecordType::Document
    }

    /// Encode to the stored JSON form.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(&DocumentOut {
            record_type: RecordType::Document.tag(),
            document: &self.content,
            hash: self.identifier.as_str(),
        })
        .map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Decode from the stored JSON form.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let wire: DocumentIn =
            serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
        check_type(RecordType::Document, &wire.record_type)?;
        Ok(Self {
            identifier: Identifier::new(wire.hash),
            content: wire.document,
        })
    }
}

/// A stored administrator.
///
/// The password is kept and compared in plaintext. Credential hashing is a
/// known gap of the registry and is not addressed here.
#[derive(Clone, PartialEq, Eq)]
pub struct Admin {
    pub admin_id: AdminId,
    pub username: String,
    pub password: String,
    /// Message log. Only ever appended to.
    pub messages: Vec<String>,
}

#[derive(Serialize)]
struct AdminOut<'a> {
    #[serde(rename = "Type")]
    record_type: &'static str,
    #[serde(rename = "adminID")]
    admin_id: &'a str,
    username: &'a str,
    password: &'a str,
    message: &'a [String],
}

#[derive(Deserialize)]
struct AdminIn {
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "adminID")]
    admin_id: String,
    username: String,
    password: String,
    // Older writers emit `null` for an empty log.
    message: Option<Vec<String>>,
}

impl Admin {
    /// A new admin whose log holds exactly `initial_message`.
    pub fn new(
        admin_id: AdminId,
        username: impl Into<String>,
        password: impl Into<String>,
        initial_message: impl Into<String>,
    ) -> Self {
        Self {
            admin_id,
            username: username.into(),
            password: password.into(),
            messages: vec![initial_message.into()],
        }
    }

    pub const fn record_type(&self) -> RecordType {
        RecordType::Admin
    }

    /// Append to the end of the message log. No deduplication.
    pub fn append_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Encode to the stored JSON form.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(&AdminOut {
            record_type: RecordType::Admin.tag(),
            admin_id: self.admin_id.as_str(),
            username: &self.username,
            password: &self.password,
            message: &self.messages,
        })
        .map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Decode from the stored JSON form.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let wire: AdminIn =
            serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
        check_type(RecordType::Admin, &wire.record_type)?;
        Ok(Self {
            admin_id: AdminId::new(wire.admin_id),
            username: wire.username,
            password: wire.password,
            messages: wire.message.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Admin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admin")
            .field("admin_id", &self.admin_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("messages", &self.messages)
            .finish()
    }
}

fn check_type(expected: RecordType, actual: &str) -> Result<(), CoreError> {
    if actual == expected.tag() {
        Ok(())
    } else {
        Err(CoreError::RecordTypeMismatch {
            expected: expected.tag().to_string(),
            actual: actual.to_string(),
        })
    }
}
