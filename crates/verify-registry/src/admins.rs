//! Admin registry: create-once records with an append-only message log.
//!
//! Passwords are stored and matched in plaintext. This is a known gap;
//! nothing here hashes credentials or compares them in constant time.

use bytes::Bytes;

use verify_registry_core::{
    fields, require_non_empty, validate_selector_value, Admin, AdminId, RecordType,
};
use verify_registry_store::Store;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

impl<S: Store> Registry<S> {
    /// Create an admin whose message log starts with `initial_message`.
    pub async fn add_admin(
        &self,
        admin_id: &str,
        username: &str,
        password: &str,
        initial_message: &str,
    ) -> Result<()> {
        require_non_empty("adminID", admin_id)?;
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;
        require_non_empty("message", initial_message)?;
        // Credentials must stay queryable by `authenticate_admin`.
        let max_len = self.config().max_value_len;
        validate_selector_value(fields::USERNAME, username, max_len)?;
        validate_selector_value(fields::PASSWORD, password, max_len)?;

        if self.store.get_state(admin_id).await?.is_some() {
            tracing::warn!(admin_id, "admin ID already in use");
            return Err(RegistryError::AlreadyExists(format!("admin {}", admin_id)));
        }

        let record = Admin::new(AdminId::new(admin_id), username, password, initial_message);
        self.store
            .put_state(admin_id, Bytes::from(record.encode()?))
            .await?;

        tracing::info!(admin_id, "saved admin");
        Ok(())
    }

    /// Append `message` to the end of an admin's log.
    ///
    /// The store has no partial update, so the whole record is rewritten.
    pub async fn update_admin_message(&self, admin_id: &str, message: &str) -> Result<()> {
        require_non_empty("adminID", admin_id)?;
        require_non_empty("message", message)?;

        let bytes = self
            .store
            .get_state(admin_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(format!("admin {}", admin_id)))?;

        let mut record = Admin::decode(&bytes)?;
        record.append_message(message);
        self.store
            .put_state(admin_id, Bytes::from(record.encode()?))
            .await?;

        tracing::info!(admin_id, messages = record.messages.len(), "appended admin message");
        Ok(())
    }

    /// Admins whose username and password both equal the arguments exactly,
    /// as a JSON array.
    pub async fn authenticate_admin(&self, username: &str, password: &str) -> Result<Bytes> {
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        let selector = self
            .selector(RecordType::Admin)
            .and_eq(fields::USERNAME, username)?
            .and_eq(fields::PASSWORD, password)?;
        self.run_query(&selector).await
    }

    /// Point read of one admin.
    pub async fn admin(&self, admin_id: &str) -> Result<Option<Admin>> {
        match self.store.get_state(admin_id).await? {
            Some(bytes) => Ok(Some(Admin::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;
    use verify_registry_core::DEFAULT_MAX_VALUE_LEN;
    use verify_registry_store::MemoryStore;

    fn registry() -> Registry<MemoryStore> {
        Registry::new(MemoryStore::new(), RegistryConfig::default())
    }

    fn parse(bytes: &[u8]) -> Vec<serde_json::Value> {
        serde_json::from_slice::<serde_json::Value>(bytes)
            .unwrap()
            .as_array()
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_add_admin_requires_every_argument() {
        let registry = registry();
        let cases = [
            ("", "u", "p", "m"),
            ("id", "", "p", "m"),
            ("id", "u", "", "m"),
            ("id", "u", "p", ""),
        ];
        for (id, u, p, m) in cases {
            assert!(matches!(
                registry.add_admin(id, u, p, m).await,
                Err(RegistryError::InvalidArgument(_))
            ));
        }
        assert!(registry.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_add_admin_rejects_unqueryable_credentials() {
        let registry = registry();
        let long = "p".repeat(DEFAULT_MAX_VALUE_LEN + 1);
        let cases = [
            ("ali\tce", "pw"),
            ("alice", "pw\n"),
            ("alice", long.as_str()),
            ("\u{7f}", "pw"),
        ];
        for (u, p) in cases {
            assert!(
                matches!(
                    registry.add_admin("a1", u, p, "m").await,
                    Err(RegistryError::InvalidArgument(_))
                ),
                "{:?}",
                u
            );
        }
        assert!(registry.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_stored_credentials_are_always_queryable() {
        let registry = registry();
        let longest = "p".repeat(DEFAULT_MAX_VALUE_LEN);
        registry.add_admin("a1", "ali\"ce\\", &longest, "m").await.unwrap();

        let hits = parse(&registry.authenticate_admin("ali\"ce\\", &longest).await.unwrap());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["Key"], "a1");
    }

    #[tokio::test]
    async fn test_add_admin_duplicate() {
        let registry = registry();
        registry.add_admin("a1", "alice", "pw", "hello").await.unwrap();
        let err = registry.add_admin("a1", "bob", "pw2", "hi").await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(_)));

        let stored = registry.admin("a1").await.unwrap().unwrap();
        assert_eq!(stored.username, "alice");
    }

    #[tokio::test]
    async fn test_update_appends_in_order() {
        let registry = registry();
        registry.add_admin("a1", "alice", "pw", "m1").await.unwrap();
        registry.update_admin_message("a1", "m2").await.unwrap();
        registry.update_admin_message("a1", "m3").await.unwrap();
        registry.update_admin_message("a1", "m2").await.unwrap();

        let stored = registry.admin("a1").await.unwrap().unwrap();
        assert_eq!(stored.messages, vec!["m1", "m2", "m3", "m2"]);
        assert_eq!(stored.username, "alice");
        assert_eq!(stored.password, "pw");
    }

    #[tokio::test]
    async fn test_update_unknown_admin() {
        let registry = registry();
        let err = registry.update_admin_message("ghost", "m").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_requires_arguments() {
        let registry = registry();
        registry.add_admin("a1", "alice", "pw", "m1").await.unwrap();
        assert!(matches!(
            registry.update_admin_message("a1", "").await,
            Err(RegistryError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.update_admin_message("", "m").await,
            Err(RegistryError::InvalidArgument(_))
        ));
        assert_eq!(registry.admin("a1").await.unwrap().unwrap().messages, vec!["m1"]);
    }

    #[tokio::test]
    async fn test_update_on_document_key_fails_to_decode() {
        let registry = registry();
        let id = registry.add_document("doc").await.unwrap();
        let err = registry
            .update_admin_message(id.as_str(), "m")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_authenticate_exact_match_only() {
        let registry = registry();
        registry.add_admin("a1", "alice", "secret", "m").await.unwrap();
        registry.add_admin("a2", "bob", "secret", "m").await.unwrap();

        let hits = parse(&registry.authenticate_admin("alice", "secret").await.unwrap());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["Key"], "a1");
        assert_eq!(hits[0]["Record"]["adminID"], "a1");
        assert_eq!(hits[0]["Record"]["message"][0], "m");

        for (u, p) in [("alic", "secret"), ("alice", "secre"), ("ALICE", "secret"), ("alice", "secret ")] {
            let out = registry.authenticate_admin(u, p).await.unwrap();
            assert_eq!(&out[..], b"[]");
        }
    }

    #[tokio::test]
    async fn test_authenticate_escapes_injection_attempt() {
        let registry = registry();
        registry.add_admin("a1", "alice", "secret", "m").await.unwrap();

        let out = registry
            .authenticate_admin("alice", r#"x","password":{"$ne":"x"#)
            .await
            .unwrap();
        assert_eq!(&out[..], b"[]");
    }

    #[tokio::test]
    async fn test_authenticate_requires_arguments() {
        let registry = registry();
        assert!(matches!(
            registry.authenticate_admin("", "p").await,
            Err(RegistryError::InvalidArgument(_))
        ));
    }
}
