//! Storage collaborator seams.
//!
//! The reconciler never persists anything itself. It reads a
//! [`DocumentStore`] and hands the resulting plan back to it; a
//! [`CollectionProvisioner`] resolves (or creates) the store for a key.

use serde_json::Value;

use eq5e_core::{record, CollectionKey, DocumentId, Role, SpellId};

use crate::SyncError;

/// A document as currently persisted, with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: DocumentId,
    /// Full payload, excluding the id.
    pub payload: Value,
}

impl StoredRecord {
    pub fn new(id: impl Into<DocumentId>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    pub fn spell_id(&self) -> Option<SpellId> {
        record::spell_id(&self.payload)
    }

    pub fn derived_hash(&self) -> Option<&str> {
        record::derived_hash(&self.payload)
    }
}

/// A writable document collection.
///
/// Batches are applied in order. Each call returns the documents the store
/// actually wrote.
pub trait DocumentStore {
    /// Collection key, used in logs and errors.
    fn key(&self) -> &CollectionKey;

    fn query_all(&self) -> Result<Vec<StoredRecord>, SyncError>;

    fn create_batch(&mut self, docs: Vec<Value>) -> Result<Vec<StoredRecord>, SyncError>;

    fn update_batch(
        &mut self,
        updates: Vec<(DocumentId, Value)>,
    ) -> Result<Vec<StoredRecord>, SyncError>;
}

/// Resolves a collection by key, creating it when absent.
pub trait CollectionProvisioner {
    type Collection: DocumentStore;

    /// Open `key` if it exists. Never creates anything.
    fn open(&self, key: &CollectionKey) -> Result<Option<Self::Collection>, SyncError>;

    /// Return the collection for `key`.
    ///
    /// Creating a collection that does not exist yet requires [`Role::Gm`];
    /// otherwise this fails with [`SyncError::PermissionDenied`]. Opening an
    /// existing collection is allowed for any role.
    fn ensure_collection(
        &mut self,
        key: &CollectionKey,
        label: &str,
        role: Role,
    ) -> Result<Self::Collection, SyncError>;
}

/// Shared permission gate for provisioners.
pub(crate) fn require_gm(role: Role, key: &CollectionKey) -> Result<(), SyncError> {
    if role.is_gm() {
        return Ok(());
    }
    Err(SyncError::PermissionDenied {
        action: format!("only a GM can create world collection '{key}'"),
    })
}

/// Fresh store-assigned id: 16 lowercase hex characters.
pub(crate) fn new_document_id() -> DocumentId {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    DocumentId::from(&raw[..16])
}
