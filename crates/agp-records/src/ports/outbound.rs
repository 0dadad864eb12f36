//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the registry service. Production adapters live
//! in `adapters/`; the in-memory and deterministic implementations below
//! exist for unit tests and light development use.

use std::collections::{BTreeMap, HashMap};

use shared_types::{Session, SessionToken, Timestamp};
use uuid::Uuid;

use crate::domain::audit::ActivityEntry;
use crate::domain::entities::{ColumnSpec, RecordRow};
use crate::domain::errors::{SessionError, StoreError, WorkbookError};

/// One operation of an atomic commit.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Insert or replace a record row.
    PutRecord { kind: String, row: RecordRow },
    /// Append an activity-log entry.
    AppendActivity { entry: ActivityEntry },
}

impl StoreOperation {
    pub fn put_record(kind: &str, row: RecordRow) -> Self {
        StoreOperation::PutRecord {
            kind: kind.to_string(),
            row,
        }
    }

    pub fn append_activity(entry: ActivityEntry) -> Self {
        StoreOperation::AppendActivity { entry }
    }
}

/// Abstract interface for record persistence.
///
/// Rows carry arbitrary nested JSON fields; the store never interprets
/// them. `commit` is the only write path and must be atomic: either every
/// operation in the batch is applied, or none are. This is what keeps a
/// record and its activity entry from desynchronizing.
pub trait RecordStore: Send + Sync {
    /// Fetch one row by kind and identifier, deleted or not.
    fn fetch(&self, kind: &str, uuid: &Uuid) -> Result<Option<RecordRow>, StoreError>;

    /// Fetch every row of a kind, deleted or not, in stable order.
    fn fetch_all(&self, kind: &str) -> Result<Vec<RecordRow>, StoreError>;

    /// Advance and return the sequence counter for a kind. Counters are
    /// persisted with the data so codes survive restarts.
    fn next_sequence(&mut self, kind: &str) -> Result<u64, StoreError>;

    /// Apply a batch of operations atomically.
    fn commit(&mut self, operations: Vec<StoreOperation>) -> Result<(), StoreError>;

    /// Activity entries for a kind, oldest first. Verification accessor;
    /// the portal exposes no activity read API.
    fn activity(&self, kind: &str) -> Result<Vec<ActivityEntry>, StoreError>;
}

/// Abstract interface for time (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for record identifier generation.
pub trait IdGenerator: Send + Sync {
    fn next_uuid(&mut self) -> Uuid;
}

/// The session precondition evaluated at the start of every resolver
/// operation. Token comparison must be constant-time.
pub trait SessionGate: Send + Sync {
    fn assert_valid(&self, token: &SessionToken) -> Result<Session, SessionError>;
}

/// Pure workbook rendering collaborator.
///
/// Cell formatting is out of scope; implementations take cells as strings
/// and return finished bytes.
pub trait WorkbookRenderer: Send + Sync {
    fn render_workbook(
        &self,
        columns: &[ColumnSpec],
        rows: &[Vec<String>],
    ) -> Result<Vec<u8>, WorkbookError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production: FileBackedRecordStore, StaticSessionGate, CsvWorkbookRenderer
// in adapters/. Testing: in-memory and deterministic implementations below.
// =============================================================================

/// Default time source using system time.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        shared_types::current_timestamp()
    }
}

/// Settable time source for unit tests.
pub struct FixedTimeSource {
    now: std::sync::atomic::AtomicU64,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: std::sync::atomic::AtomicU64::new(now),
        }
    }

    /// Move the clock for test scenarios.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Default id generator using random v4 UUIDs.
#[derive(Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic id generator for unit tests.
#[derive(Default)]
pub struct SequentialIdGenerator {
    counter: u128,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_uuid(&mut self) -> Uuid {
        self.counter += 1;
        Uuid::from_u128(self.counter)
    }
}

/// In-memory record store for unit tests.
///
/// Single-threaded maps make the batch commit trivially atomic. Production
/// uses `FileBackedRecordStore`, which persists the same state shape.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: HashMap<String, BTreeMap<Uuid, RecordRow>>,
    sequences: HashMap<String, u64>,
    activity: Vec<ActivityEntry>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn fetch(&self, kind: &str, uuid: &Uuid) -> Result<Option<RecordRow>, StoreError> {
        Ok(self
            .records
            .get(kind)
            .and_then(|rows| rows.get(uuid))
            .cloned())
    }

    fn fetch_all(&self, kind: &str) -> Result<Vec<RecordRow>, StoreError> {
        Ok(self
            .records
            .get(kind)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    fn next_sequence(&mut self, kind: &str) -> Result<u64, StoreError> {
        let counter = self.sequences.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    fn commit(&mut self, operations: Vec<StoreOperation>) -> Result<(), StoreError> {
        // For in-memory, applying all operations is already atomic.
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
        Ok(())
    }

    fn activity(&self, kind: &str) -> Result<Vec<ActivityEntry>, StoreError> {
        Ok(self
            .activity
            .iter()
            .filter(|e| e.entity_kind == kind)
            .cloned()
            .collect())
    }
}
