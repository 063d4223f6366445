//! GenerationStore trait for recording generation history.
//!
//! Persistence lives outside the engine. The engine only issues plain
//! read/write calls against a store keyed by integer id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for generation store operations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Generation record not found: {0}")]
    NotFound(i64),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One completed generation, as handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// File name of the delivered artifact, relative to the output directory.
    pub filename: String,
    pub cv_file: Option<String>,
    pub cover_letter_file: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// True when several artifacts were merged into `filename`.
    pub combined: bool,
    /// Caller label (typically the company name) used for the combined file.
    pub label: Option<String>,
    /// Values of the `company_name` and `job_title` variables the documents
    /// were rendered with.
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A store for generation history records.
///
/// # Implementations
///
/// - `InMemoryGenerationStore`: process-local map (always available)
pub trait GenerationStore: Send + Sync + Debug {
    /// Persist a record and return its assigned id.
    fn insert(&self, record: GenerationRecord) -> Result<i64, StoreError>;

    fn get(&self, id: i64) -> Result<Option<GenerationRecord>, StoreError>;

    /// Most recent records first, at most `limit` of them.
    fn list(&self, limit: usize) -> Result<Vec<(i64, GenerationRecord)>, StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Remove every record, returning how many were deleted.
    fn clear(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct Records {
    next_id: i64,
    by_id: BTreeMap<i64, GenerationRecord>,
}

/// An in-memory generation store with monotonically increasing ids.
#[derive(Debug, Default)]
pub struct InMemoryGenerationStore {
    records: RwLock<Records>,
}

impl InMemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.by_id.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.records.read().map(|r| r.by_id.is_empty()).unwrap_or(true)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("generation store lock poisoned".to_string())
}

impl GenerationStore for InMemoryGenerationStore {
    fn insert(&self, record: GenerationRecord) -> Result<i64, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.next_id += 1;
        let id = records.next_id;
        records.by_id.insert(id, record);
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<GenerationRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.by_id.get(&id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<(i64, GenerationRecord)>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut all: Vec<_> = records
            .by_id
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        // Newest first; ids break ties between records created in the same instant.
        all.sort_by(|(a_id, a), (b_id, b)| {
            b.created_at.cmp(&a.created_at).then(b_id.cmp(a_id))
        });
        all.truncate(limit);
        Ok(all)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let removed = records.by_id.len();
        records.by_id.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(filename: &str, second: u32) -> GenerationRecord {
        GenerationRecord {
            filename: filename.to_string(),
            cv_file: Some("cv.tex".to_string()),
            cover_letter_file: None,
            attachments: vec![],
            combined: false,
            label: None,
            company_name: Some("Globex".to_string()),
            job_title: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = InMemoryGenerationStore::new();
        let first = store.insert(record("a.pdf", 0)).unwrap();
        let second = store.insert(record("b.pdf", 1)).unwrap();

        assert!(second > first);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).unwrap().unwrap().filename, "a.pdf");
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = InMemoryGenerationStore::new();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_list_is_newest_first_and_limited() {
        let store = InMemoryGenerationStore::new();
        store.insert(record("old.pdf", 0)).unwrap();
        store.insert(record("new.pdf", 30)).unwrap();
        store.insert(record("mid.pdf", 15)).unwrap();

        let listed = store.list(2).unwrap();
        let names: Vec<_> = listed.iter().map(|(_, r)| r.filename.as_str()).collect();
        assert_eq!(names, vec!["new.pdf", "mid.pdf"]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let store = InMemoryGenerationStore::new();
        let err = store.delete(7).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(7)));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = InMemoryGenerationStore::new();
        let id = store.insert(record("a.pdf", 0)).unwrap();
        store.insert(record("b.pdf", 1)).unwrap();

        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.is_empty());
    }
}
