//! # Domain Errors
//!
//! Error types for the record registry.
//!
//! ## Design Principles
//!
//! - Fail fast: no error here is retried; messages surface verbatim
//! - Session and envelope failures abort before any side effect
//! - Validation failures abort before persistence

use agp_envelope::EnvelopeError;
use shared_types::Timestamp;
use thiserror::Error;
use uuid::Uuid;

/// Session validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Token does not match any known session.
    #[error("Unknown session token")]
    UnknownToken,

    /// Session exists but has lapsed.
    #[error("Session expired at {expired_at}, now {now}")]
    Expired { expired_at: Timestamp, now: Timestamp },
}

/// Errors that can occur during registry operations.
///
/// Each variant corresponds to a specific precondition or failure mode.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// Session precondition failed; nothing was decoded or persisted.
    #[error("Session rejected: {0}")]
    Auth(#[from] SessionError),

    /// Envelope could not be opened (tampered, malformed, stale).
    #[error("Envelope rejected: {0}")]
    Envelope(#[from] EnvelopeError),

    /// A declared relation carried no identifier.
    #[error("Required relation '{field}' is missing")]
    MissingRelation { field: &'static str },

    /// A declared relation references a record that is absent or deleted.
    #[error("Relation '{field}' references unknown {kind} record {uuid}")]
    RelationNotFound {
        field: &'static str,
        kind: &'static str,
        uuid: Uuid,
    },

    /// Another live record of this kind already holds the unique key.
    #[error("Duplicate {kind} record: '{key}' already exists")]
    DuplicateUniqueKey { kind: &'static str, key: String },

    /// No live record with this identifier.
    #[error("{kind} record {uuid} not found")]
    NotFound { kind: &'static str, uuid: Uuid },

    /// Stored or submitted fields could not be (de)serialized.
    #[error("Record fields rejected: {message}")]
    InvalidFields { message: String },

    /// Storage layer failure.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    /// Workbook rendering failure.
    #[error("Workbook rendering failed: {0}")]
    Workbook(#[from] WorkbookError),
}

/// Record store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Persisted data could not be parsed.
    CorruptionError { message: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IOError { message } => write!(f, "store I/O error: {}", message),
            StoreError::CorruptionError { message } => {
                write!(f, "store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Workbook rendering errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookError {
    /// A row's cell count does not match the column spec.
    ShapeMismatch { row: usize, cells: usize, columns: usize },
}

impl std::fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkbookError::ShapeMismatch { row, cells, columns } => {
                write!(
                    f,
                    "workbook row {} has {} cells, expected {}",
                    row, cells, columns
                )
            }
        }
    }
}

impl std::error::Error for WorkbookError {}
