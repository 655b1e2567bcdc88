//! Document registry: create-only records keyed by a generated identifier.

use bytes::Bytes;

use verify_registry_core::{fields, require_non_empty, Document, Identifier, RecordType};
use verify_registry_store::Store;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

impl<S: Store> Registry<S> {
    /// Store a new document and return its identifier.
    ///
    /// The record is written under its identifier. The existence check and
    /// the write are separate store calls; concurrent creators racing on the
    /// same identifier are arbitrated by the ledger.
    pub async fn add_document(&self, content: &str) -> Result<Identifier> {
        require_non_empty("content", content)?;

        let identifier = self.identifiers.generate(content);
        if self.store.get_state(identifier.as_str()).await?.is_some() {
            tracing::warn!(identifier = %identifier, "document identifier already in use");
            return Err(RegistryError::AlreadyExists(format!(
                "document {}",
                identifier
            )));
        }

        let record = Document::new(identifier.clone(), content);
        self.store
            .put_state(identifier.as_str(), Bytes::from(record.encode()?))
            .await?;

        tracing::info!(identifier = %identifier, "saved document");
        Ok(identifier)
    }

    /// Every document, serialized as a JSON array.
    pub async fn list_documents(&self) -> Result<Bytes> {
        self.run_query(&self.selector(RecordType::Document)).await
    }

    /// Documents whose identifier equals `identifier`, as a JSON array.
    pub async fn get_document_by_identifier(&self, identifier: &str) -> Result<Bytes> {
        require_non_empty("identifier", identifier)?;
        let selector = self
            .selector(RecordType::Document)
            .and_eq(fields::HASH, identifier)?;
        self.run_query(&selector).await
    }

    /// Point read of one document.
    pub async fn document(&self, identifier: &str) -> Result<Option<Document>> {
        match self.store.get_state(identifier).await? {
            Some(bytes) => Ok(Some(Document::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}
