//! The read-only record store.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// Immutable collection of records, fixed when the store is built.
///
/// The store has no interior mutability, so it can be shared across request
/// tasks behind an `Arc` without locking.
///
/// # Example
///
/// ```
/// use atrium_store::RecordStore;
///
/// let store = RecordStore::demo();
/// assert!(store.list_all().iter().all(|r| r.details.is_none()));
/// assert!(store.get_by_id("2").unwrap().details.is_some());
/// assert!(store.get_by_id("999").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Builds a store from seed records, rejecting duplicate identifiers.
    pub fn from_records(records: Vec<Record>) -> StoreResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(StoreError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// Loads a store from a JSON file holding an array of records.
    pub fn from_seed_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::from_records(records)?;
        tracing::info!(path = %path.display(), records = store.len(), "loaded record seed file");
        Ok(store)
    }

    /// The built-in demo directory.
    pub fn demo() -> Self {
        let records = vec![
            Record::new("1", "Ada Lovelace", "ada@example.com")
                .with_details("Writes programs for engines that do not exist yet.", "London"),
            Record::new("2", "Grace Hopper", "grace@example.com")
                .with_details("Compiler author and nanosecond enthusiast.", "Arlington"),
            Record::new("3", "Alan Turing", "alan@example.com")
                .with_details("Asks whether machines can think.", "Manchester"),
            Record::new("4", "Dave Null", "dave@example.com"),
        ];
        let index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id.clone(), position))
            .collect();
        Self { records, index }
    }

    /// Returns every record with its detail block removed, in seed order.
    pub fn list_all(&self) -> Vec<Record> {
        self.records.iter().map(Record::summary).collect()
    }

    /// Returns the full record with the given identifier.
    pub fn get_by_id(&self, id: &str) -> StoreResult<Record> {
        self.index
            .get(id)
            .map(|&position| self.records[position].clone())
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
