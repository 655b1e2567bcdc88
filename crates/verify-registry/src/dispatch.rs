//! Named-operation dispatch.
//!
//! Maps an operation name and positional string arguments onto the
//! registry's typed methods. Argument counts must match exactly.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use verify_registry_store::Store;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// Operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddDocument,
    QueryDocuments,
    QueryDocumentByIdentifier,
    AddAdmin,
    QueryAdmin,
    UpdateAdmin,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::AddDocument,
        Operation::QueryDocuments,
        Operation::QueryDocumentByIdentifier,
        Operation::AddAdmin,
        Operation::QueryAdmin,
        Operation::UpdateAdmin,
    ];

    /// Canonical operation name.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::AddDocument => "addDocument",
            Operation::QueryDocuments => "queryDocuments",
            Operation::QueryDocumentByIdentifier => "queryDocumentByIdentifier",
            Operation::AddAdmin => "addAdmin",
            Operation::QueryAdmin => "queryAdmin",
            Operation::UpdateAdmin => "updateAdmin",
        }
    }

    /// Number of positional arguments the operation takes.
    pub const fn arity(self) -> usize {
        match self {
            Operation::QueryDocuments => 0,
            Operation::AddDocument | Operation::QueryDocumentByIdentifier => 1,
            Operation::QueryAdmin | Operation::UpdateAdmin => 2,
            Operation::AddAdmin => 4,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RegistryError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "addDocument" => Ok(Operation::AddDocument),
            "queryDocuments" => Ok(Operation::QueryDocuments),
            // Older clients use the "hash" name for the identifier lookup.
            "queryDocumentByIdentifier" | "queryDocumentByHash" => {
                Ok(Operation::QueryDocumentByIdentifier)
            }
            "addAdmin" => Ok(Operation::AddAdmin),
            "queryAdmin" => Ok(Operation::QueryAdmin),
            "updateAdmin" => Ok(Operation::UpdateAdmin),
            other => Err(RegistryError::UnknownOperation(other.to_string())),
        }
    }
}

impl<S: Store> Registry<S> {
    /// Invoke an operation by name.
    ///
    /// Returns the JSON payload for query operations and `None` for writes.
    pub async fn invoke<A: AsRef<str> + Sync>(
        &self,
        function: &str,
        args: &[A],
    ) -> Result<Option<Bytes>> {
        let operation = function.parse::<Operation>().map_err(|e| {
            tracing::warn!(function, "invoke did not find the requested operation");
            e
        })?;

        if args.len() != operation.arity() {
            return Err(RegistryError::InvalidArgument(format!(
                "{} expects {} argument(s), got {}",
                operation,
                operation.arity(),
                args.len()
            )));
        }
        tracing::debug!(operation = %operation, "invoking operation");

        let arg = |i: usize| args[i].as_ref();
        match operation {
            Operation::AddDocument => {
                self.add_document(arg(0)).await?;
                Ok(None)
            }
            Operation::QueryDocuments => self.list_documents().await.map(Some),
            Operation::QueryDocumentByIdentifier => {
                self.get_document_by_identifier(arg(0)).await.map(Some)
            }
            Operation::AddAdmin => {
                self.add_admin(arg(0), arg(1), arg(2), arg(3)).await?;
                Ok(None)
            }
            Operation::QueryAdmin => self.authenticate_admin(arg(0), arg(1)).await.map(Some),
            Operation::UpdateAdmin => {
                self.update_admin_message(arg(0), arg(1)).await?;
                Ok(None)
            }
        }
    }
}
