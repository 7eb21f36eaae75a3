//! In-memory collections.
//!
//! Handles returned by [`MemoryCollections::ensure_collection`] share state
//! with the provisioner, so a test can run the pipeline and then inspect
//! what was written.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use eq5e_core::{CollectionKey, DocumentId, Role};

use crate::error::write_err;
use crate::store::{new_document_id, require_gm, CollectionProvisioner, DocumentStore, StoredRecord};
use crate::SyncError;

#[derive(Debug, Default)]
struct Shelf {
    label: String,
    docs: Vec<StoredRecord>,
}

#[derive(Debug, Default)]
struct State {
    shelves: HashMap<CollectionKey, Shelf>,
    reject_creates: bool,
    reject_updates: bool,
}

/// Provisioner over process-local collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollections {
    state: Arc<Mutex<State>>,
}

impl MemoryCollections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a collection, bypassing the permission gate.
    pub fn seed(&self, key: &CollectionKey, label: &str, docs: Vec<StoredRecord>) {
        let mut state = lock(&self.state);
        state.shelves.insert(
            key.clone(),
            Shelf {
                label: label.to_string(),
                docs,
            },
        );
    }

    /// Snapshot of the documents in `key`, in insertion order.
    pub fn documents(&self, key: &CollectionKey) -> Vec<StoredRecord> {
        lock(&self.state)
            .shelves
            .get(key)
            .map(|s| s.docs.clone())
            .unwrap_or_default()
    }

    pub fn label(&self, key: &CollectionKey) -> Option<String> {
        lock(&self.state).shelves.get(key).map(|s| s.label.clone())
    }

    pub fn contains(&self, key: &CollectionKey) -> bool {
        lock(&self.state).shelves.contains_key(key)
    }

    /// Make every subsequent create batch fail.
    pub fn reject_creates(&self, reject: bool) {
        lock(&self.state).reject_creates = reject;
    }

    /// Make every subsequent update batch fail.
    pub fn reject_updates(&self, reject: bool) {
        lock(&self.state).reject_updates = reject;
    }
}

impl CollectionProvisioner for MemoryCollections {
    type Collection = MemoryCollection;

    fn open(&self, key: &CollectionKey) -> Result<Option<MemoryCollection>, SyncError> {
        if !self.contains(key) {
            return Ok(None);
        }
        Ok(Some(MemoryCollection {
            key: key.clone(),
            state: Arc::clone(&self.state),
        }))
    }

    fn ensure_collection(
        &mut self,
        key: &CollectionKey,
        label: &str,
        role: Role,
    ) -> Result<MemoryCollection, SyncError> {
        let mut state = lock(&self.state);
        if !state.shelves.contains_key(key) {
            require_gm(role, key)?;
            tracing::info!("created collection {key} ({label})");
            state.shelves.insert(
                key.clone(),
                Shelf {
                    label: label.to_string(),
                    docs: Vec::new(),
                },
            );
        }
        Ok(MemoryCollection {
            key: key.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

/// Handle to one in-memory collection.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    key: CollectionKey,
    state: Arc<Mutex<State>>,
}

impl DocumentStore for MemoryCollection {
    fn key(&self) -> &CollectionKey {
        &self.key
    }

    fn query_all(&self) -> Result<Vec<StoredRecord>, SyncError> {
        Ok(lock(&self.state)
            .shelves
            .get(&self.key)
            .map(|s| s.docs.clone())
            .unwrap_or_default())
    }

    fn create_batch(&mut self, docs: Vec<Value>) -> Result<Vec<StoredRecord>, SyncError> {
        let mut state = lock(&self.state);
        if state.reject_creates {
            return Err(write_err(self.key.0.clone(), "create batch rejected"));
        }
        let shelf = state.shelves.entry(self.key.clone()).or_default();
        let written: Vec<StoredRecord> = docs
            .into_iter()
            .map(|payload| StoredRecord::new(new_document_id(), payload))
            .collect();
        shelf.docs.extend(written.iter().cloned());
        Ok(written)
    }

    fn update_batch(
        &mut self,
        updates: Vec<(DocumentId, Value)>,
    ) -> Result<Vec<StoredRecord>, SyncError> {
        let mut state = lock(&self.state);
        if state.reject_updates {
            return Err(write_err(self.key.0.clone(), "update batch rejected"));
        }
        let shelf = state.shelves.entry(self.key.clone()).or_default();
        let mut written = Vec::with_capacity(updates.len());
        for (id, payload) in updates {
            // Unknown ids are dropped, so the written count can be short.
            if let Some(doc) = shelf.docs.iter_mut().find(|d| d.id == id) {
                doc.payload = payload;
                written.push(doc.clone());
            }
        }
        Ok(written)
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
