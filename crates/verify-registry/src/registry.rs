//! The Registry: documents and admins over one key-value ledger.
//!
//! Both record types share a single keyspace and are told apart by their
//! `Type` tag. Document operations live in [`crate::documents`], admin
//! operations in [`crate::admins`].

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use verify_registry_core::{
    ContentDigest, IdentifierSource, RandomIdentifiers, RecordType, Selector,
    DEFAULT_MAX_VALUE_LEN, IDENTIFIER_LENGTH,
};
use verify_registry_store::Store;

use crate::error::{RegistryError, Result};
use crate::serializer::serialize_results;

/// How new document identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// Random letters; collisions are possible and are rejected on create.
    #[default]
    Random,
    /// Hex Blake3 digest of the content. Storing identical content twice
    /// fails with `AlreadyExists`.
    ContentDigest,
}

/// Configuration for the Registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub identifier_strategy: IdentifierStrategy,
    /// Length of random identifiers.
    pub identifier_length: usize,
    /// Seed for the identifier RNG. Drawn from OS entropy when unset.
    pub seed: Option<u64>,
    /// Longest value accepted into a selector, in bytes.
    pub max_value_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            identifier_strategy: IdentifierStrategy::Random,
            identifier_length: IDENTIFIER_LENGTH,
            seed: None,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

impl RegistryConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(bytes)
            .map_err(|e| RegistryError::InvalidArgument(format!("config: {}", e)))?;
        if config.identifier_length == 0 {
            return Err(RegistryError::InvalidArgument(
                "config: identifier_length must be positive".into(),
            ));
        }
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RegistryError::InvalidArgument(format!("config {}: {}", path.display(), e))
        })?;
        Self::from_json(&bytes)
    }

    /// Build the identifier source this configuration describes.
    ///
    /// Called once per registry, so a random source is seeded exactly once.
    pub fn identifier_source(&self) -> Box<dyn IdentifierSource> {
        match self.identifier_strategy {
            IdentifierStrategy::Random => {
                let source = match self.seed {
                    Some(seed) => RandomIdentifiers::from_seed(seed),
                    None => RandomIdentifiers::from_entropy(),
                };
                Box::new(source.with_length(self.identifier_length))
            }
            IdentifierStrategy::ContentDigest => Box::new(ContentDigest),
        }
    }
}

/// The main Registry struct.
///
/// Provides:
/// - Document creation and queries
/// - Admin creation, message appends, and credential lookup
/// - Named-operation dispatch (see [`crate::dispatch`])
pub struct Registry<S: Store> {
    /// The ledger.
    pub(crate) store: S,
    /// Produces document keys. Lives as long as the registry.
    pub(crate) identifiers: Box<dyn IdentifierSource>,
    config: RegistryConfig,
}

impl<S: Store> Registry<S> {
    /// Create a registry whose identifier source follows `config`.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        let identifiers = config.identifier_source();
        Self {
            store,
            identifiers,
            config,
        }
    }

    /// Create a registry with an explicit identifier source.
    ///
    /// `config.identifier_strategy`, `identifier_length` and `seed` are
    /// ignored.
    pub fn with_identifier_source(
        store: S,
        identifiers: impl IdentifierSource + 'static,
        config: RegistryConfig,
    ) -> Self {
        Self {
            store,
            identifiers: Box::new(identifiers),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// A selector over `record_type` bounded by the configured value length.
    pub(crate) fn selector(&self, record_type: RecordType) -> Selector {
        Selector::of_type(record_type).max_value_len(self.config.max_value_len)
    }

    /// Run a selector and serialize every result.
    pub(crate) async fn run_query(&self, selector: &Selector) -> Result<Bytes> {
        // Field names only: admin selectors carry credentials.
        tracing::debug!(
            record_type = %selector.record_type(),
            fields = ?selector.field_names(),
            "running rich query"
        );
        let results = self
            .store
            .get_query_result(&selector.to_query_string())
            .await?;
        serialize_results(results).await
    }
}
