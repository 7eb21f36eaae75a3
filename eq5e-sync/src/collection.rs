//! File-backed world collections.
//!
//! Each collection is one JSON document at
//! `<home>/.eq5e/packs/<name>.json`:
//!
//! ```json
//! { "label": "EQ5e Spells (Core)", "documentType": "Item", "package": "world",
//!   "updatedAt": "2026-01-01T00:00:00Z", "documents": [ { "_id": "…", … } ] }
//! ```
//!
//! A bare JSON array of documents is accepted on load and rewritten in the
//! structured form on the next save. Documents without an `_id` get one the
//! first time the collection is opened for writing. Saves use `.tmp` + rename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use eq5e_core::{paths::packs_dir, CollectionKey, DocumentId, Role};

use crate::error::{io_err, write_err};
use crate::store::{new_document_id, require_gm, CollectionProvisioner, DocumentStore, StoredRecord};
use crate::SyncError;

const ID_FIELD: &str = "_id";

/// On-disk collection payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFile {
    pub label: String,
    #[serde(default = "default_document_type")]
    pub document_type: String,
    #[serde(default = "default_package")]
    pub package: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<Value>,
}

fn default_document_type() -> String {
    "Item".to_string()
}

fn default_package() -> String {
    "world".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CollectionCompat {
    Structured(CollectionFile),
    Legacy(Vec<Value>),
}

/// Path to the collection JSON for `key`, rooted at `home`.
pub fn collection_path_at(home: &Path, key: &CollectionKey) -> PathBuf {
    packs_dir(home).join(format!("{}.json", key.name()))
}

/// Load a collection file. Legacy bare arrays get a label derived from the key.
pub fn load_at(home: &Path, key: &CollectionKey) -> Result<CollectionFile, SyncError> {
    let path = collection_path_at(home, key);
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    match serde_json::from_str::<CollectionCompat>(&contents)? {
        CollectionCompat::Structured(file) => Ok(file),
        CollectionCompat::Legacy(documents) => Ok(CollectionFile {
            label: key.name().to_string(),
            document_type: default_document_type(),
            package: key.package().to_string(),
            updated_at: Utc::now(),
            documents,
        }),
    }
}

/// Save a collection file atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(home: &Path, key: &CollectionKey, file: &CollectionFile) -> Result<(), SyncError> {
    let path = collection_path_at(home, key);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid collection path")));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(file)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Provisioner
// ---------------------------------------------------------------------------

/// Provisioner over `<home>/.eq5e/packs/`.
#[derive(Debug, Clone)]
pub struct FileCollections {
    home: PathBuf,
}

impl FileCollections {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

impl CollectionProvisioner for FileCollections {
    type Collection = FileCollection;

    fn open(&self, key: &CollectionKey) -> Result<Option<FileCollection>, SyncError> {
        if !collection_path_at(&self.home, key).exists() {
            return Ok(None);
        }
        Ok(Some(FileCollection {
            home: self.home.clone(),
            key: key.clone(),
        }))
    }

    fn ensure_collection(
        &mut self,
        key: &CollectionKey,
        label: &str,
        role: Role,
    ) -> Result<FileCollection, SyncError> {
        let path = collection_path_at(&self.home, key);
        if !path.exists() {
            require_gm(role, key)?;
            let file = CollectionFile {
                label: label.to_string(),
                document_type: default_document_type(),
                package: key.package().to_string(),
                updated_at: Utc::now(),
                documents: Vec::new(),
            };
            save_at(&self.home, key, &file).map_err(|e| write_err(key.0.clone(), e))?;
            tracing::info!("created collection {key} at {}", path.display());
        } else {
            let mut file = load_at(&self.home, key)?;
            let assigned = assign_missing_ids(&mut file.documents);
            if assigned > 0 {
                file.updated_at = Utc::now();
                save_at(&self.home, key, &file).map_err(|e| write_err(key.0.clone(), e))?;
                tracing::info!("assigned ids to {assigned} documents in {key}");
            }
        }
        Ok(FileCollection {
            home: self.home.clone(),
            key: key.clone(),
        })
    }
}

/// Handle to one file-backed collection. Every call re-reads the file.
#[derive(Debug, Clone)]
pub struct FileCollection {
    home: PathBuf,
    key: CollectionKey,
}

impl FileCollection {
    pub fn path(&self) -> PathBuf {
        collection_path_at(&self.home, &self.key)
    }

    fn persist(&self, mut file: CollectionFile) -> Result<(), SyncError> {
        file.updated_at = Utc::now();
        save_at(&self.home, &self.key, &file).map_err(|e| write_err(self.key.0.clone(), e))
    }
}

impl DocumentStore for FileCollection {
    fn key(&self) -> &CollectionKey {
        &self.key
    }

    fn query_all(&self) -> Result<Vec<StoredRecord>, SyncError> {
        let file = load_at(&self.home, &self.key)?;
        Ok(file.documents.into_iter().filter_map(from_disk).collect())
    }

    fn create_batch(&mut self, docs: Vec<Value>) -> Result<Vec<StoredRecord>, SyncError> {
        let mut file = load_at(&self.home, &self.key)?;
        let written: Vec<StoredRecord> = docs
            .into_iter()
            .map(|payload| StoredRecord::new(new_document_id(), payload))
            .collect();
        file.documents.extend(written.iter().map(to_disk));
        self.persist(file)?;
        Ok(written)
    }

    fn update_batch(
        &mut self,
        updates: Vec<(DocumentId, Value)>,
    ) -> Result<Vec<StoredRecord>, SyncError> {
        let mut file = load_at(&self.home, &self.key)?;
        let mut written = Vec::with_capacity(updates.len());
        for (id, payload) in updates {
            let slot = file
                .documents
                .iter_mut()
                .find(|d| d.get(ID_FIELD).and_then(Value::as_str) == Some(id.0.as_str()));
            match slot {
                Some(slot) => {
                    let rec = StoredRecord::new(id, payload);
                    *slot = to_disk(&rec);
                    written.push(rec);
                }
                None => tracing::warn!("update for unknown document {id} in {}", self.key),
            }
        }
        self.persist(file)?;
        Ok(written)
    }
}

/// Give every object document without a usable `_id` a fresh one.
///
/// Returns how many ids were assigned.
fn assign_missing_ids(documents: &mut [Value]) -> usize {
    let mut assigned = 0;
    for doc in documents.iter_mut() {
        let Value::Object(map) = doc else { continue };
        let has_id = matches!(map.get(ID_FIELD), Some(Value::String(id)) if !id.is_empty());
        if !has_id {
            map.insert(ID_FIELD.to_string(), Value::String(new_document_id().0));
            assigned += 1;
        }
    }
    assigned
}

/// Split the `_id` field off a stored document.
///
/// Non-object entries are skipped. Objects without an id get a transient
/// one; [`FileCollections::ensure_collection`] persists ids before any write.
fn from_disk(doc: Value) -> Option<StoredRecord> {
    let Value::Object(mut map) = doc else {
        tracing::warn!("skipping non-object document in collection file");
        return None;
    };
    let id = match map.remove(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => DocumentId::from(id),
        _ => new_document_id(),
    };
    Some(StoredRecord::new(id, Value::Object(map)))
}

fn to_disk(rec: &StoredRecord) -> Value {
    let mut map = Map::new();
    map.insert(ID_FIELD.to_string(), Value::String(rec.id.0.clone()));
    if let Value::Object(payload) = &rec.payload {
        for (k, v) in payload {
            if k != ID_FIELD {
                map.insert(k.clone(), v.clone());
            }
        }
    }
    Value::Object(map)
}
