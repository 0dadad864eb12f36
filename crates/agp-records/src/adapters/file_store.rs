//! # File-Backed Record Store
//!
//! Persists the whole registry state to a single JSON file, providing
//! durability without a database server. Suitable for district deployments
//! and development.
//!
//! Writes go through a temp file followed by an atomic rename, and a commit
//! is applied to a scratch copy of the state first, so a failed write
//! leaves both the file and the in-memory state untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::audit::ActivityEntry;
use crate::domain::entities::RecordRow;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{RecordStore, StoreOperation};

/// The persisted shape: records by kind, sequence counters, activity log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    records: BTreeMap<String, BTreeMap<Uuid, RecordRow>>,
    sequences: BTreeMap<String, u64>,
    activity: Vec<ActivityEntry>,
}

impl StoreState {
    fn apply(&mut self, operations: Vec<StoreOperation>) {
        for op in operations {
            match op {
                StoreOperation::PutRecord { kind, row } => {
                    self.records
                        .entry(kind)
                        .or_default()
                        .insert(row.columns.uuid, row);
                }
                StoreOperation::AppendActivity { entry } => {
                    self.activity.push(entry);
                }
            }
        }
    }
}

/// Durable record store backed by one JSON file.
pub struct FileBackedRecordStore {
    state: StoreState,
    path: PathBuf,
}

impl FileBackedRecordStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let state = match std::fs::read(&path) {
            Ok(bytes) => {
                let state: StoreState =
                    serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptionError {
                        message: format!("{}: {}", path.display(), e),
                    })?;
                let total: usize = state.records.values().map(BTreeMap::len).sum();
                tracing::info!(
                    "[agp-records] loaded {} records across {} kinds from {}",
                    total,
                    state.records.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "[agp-records] no store file at {}, starting empty",
                    path.display()
                );
                StoreState::default()
            }
            Err(e) => {
                return Err(StoreError::IOError {
                    message: e.to_string(),
                })
            }
        };

        Ok(Self { state, path })
    }

    fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IOError {
                message: e.to_string(),
            })?;
        }

        let bytes = serde_json::to_vec(state).map_err(|e| StoreError::IOError {
            message: e.to_string(),
        })?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &bytes).map_err(|e| StoreError::IOError {
            message: e.to_string(),
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::IOError {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

impl RecordStore for FileBackedRecordStore {
    fn fetch(&self, kind: &str, uuid: &Uuid) -> Result<Option<RecordRow>, StoreError> {
        Ok(self
            .state
            .records
            .get(kind)
            .and_then(|rows| rows.get(uuid))
            .cloned())
    }

    fn fetch_all(&self, kind: &str) -> Result<Vec<RecordRow>, StoreError> {
        Ok(self
            .state
            .records
            .get(kind)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    fn next_sequence(&mut self, kind: &str) -> Result<u64, StoreError> {
        let mut next = self.state.clone();
        let counter = next.sequences.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        let value = *counter;
        self.save(&next)?;
        self.state = next;
        Ok(value)
    }

    fn commit(&mut self, operations: Vec<StoreOperation>) -> Result<(), StoreError> {
        let mut next = self.state.clone();
        next.apply(operations);
        self.save(&next)?;
        self.state = next;
        Ok(())
    }

    fn activity(&self, kind: &str) -> Result<Vec<ActivityEntry>, StoreError> {
        Ok(self
            .state
            .activity
            .iter()
            .filter(|e| e.entity_kind == kind)
            .cloned()
            .collect())
    }
}
