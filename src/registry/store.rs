//! Persistence seam.
//!
//! The registry writes a `MatchRecord` through `MatchStore` after every
//! status transition and applied move. `MemoryStore` keeps encoded records
//! in process.

use rustc_hash::FxHashMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::engine::{MatchId, MatchRecord, RecordError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("match store lock poisoned")]
    StoragePoisoned,
    #[error("match store backend failed: {0}")]
    Backend(String),
}

/// Durable storage for match records.
pub trait MatchStore: Send + Sync {
    /// Insert or replace the record for `record.id`.
    fn save(&self, record: &MatchRecord) -> Result<(), StoreError>;

    /// Latest record for a match, if one was saved.
    fn load(&self, id: &MatchId) -> Result<Option<MatchRecord>, StoreError>;
}

/// In-process store holding bincode bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<FxHashMap<MatchId, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches.
    pub fn len(&self) -> Result<usize, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::StoragePoisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Size of the stored encoding for a match.
    pub fn encoded_len(&self, id: &MatchId) -> Result<Option<usize>, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::StoragePoisoned)?;
        Ok(guard.get(id).map(Vec::len))
    }
}

impl MatchStore for MemoryStore {
    fn save(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let bytes = record.to_bytes()?;
        let mut guard = self.records.write().map_err(|_| StoreError::StoragePoisoned)?;
        guard.insert(record.id.clone(), bytes);
        Ok(())
    }

    fn load(&self, id: &MatchId) -> Result<Option<MatchRecord>, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::StoragePoisoned)?;
        guard
            .get(id)
            .map(|bytes| MatchRecord::from_bytes(bytes))
            .transpose()
            .map_err(StoreError::from)
    }
}
