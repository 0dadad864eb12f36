//! # Registry Entities
//!
//! The split between what the server owns and what callers may write.
//!
//! Every stored record is a pair: `SystemColumns` (assigned and mutated only
//! by the service) and an entity fields object (the only part a caller can
//! supply). Update payloads deserialize into the entity's `RecordFields`
//! type, which has no system columns, so a stale client embedding
//! identifiers or timestamps cannot reach a write with them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ActorId, Timestamp};
use uuid::Uuid;

/// Server-managed columns attached to every record.
///
/// Callers never write these; the registry assigns them and the typed
/// payload shapes exclude them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemColumns {
    /// Stable record identifier.
    pub uuid: Uuid,
    /// Human-facing code, e.g. `CR-000042`. Monotonic per kind.
    pub sequence_code: String,
    /// Unix timestamp of creation.
    pub created_at: Timestamp,
    /// Unix timestamp of the last server-side write.
    pub updated_at: Timestamp,
    /// Soft-delete marker; set once, never cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Who performed the soft delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ActorId>,
}

impl SystemColumns {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A raw stored record: system columns plus an arbitrary JSON fields object.
///
/// The store tolerates any nested shape here; typing happens at the edges
/// via [`RecordRow::into_typed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub columns: SystemColumns,
    pub fields: Value,
}

impl RecordRow {
    /// Deserialize the fields object into a concrete entity type.
    pub fn into_typed<F: RecordFields>(self) -> Result<StoredRecord<F>, serde_json::Error> {
        Ok(StoredRecord {
            fields: serde_json::from_value(self.fields)?,
            columns: self.columns,
        })
    }
}

/// The soft-delete filter.
///
/// This is the single definition of "live"; every standard read path goes
/// through it. The only bypass is the explicitly named direct-by-identifier
/// fetch on the registry API.
pub fn not_deleted(row: &RecordRow) -> bool {
    !row.columns.is_deleted()
}

/// A typed stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord<F> {
    pub columns: SystemColumns,
    pub fields: F,
}

/// A relation declared by an entity, to be validated against live records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
    /// Payload field carrying the relation, for error messages.
    pub field: &'static str,
    /// Kind of the referenced entity.
    pub kind: &'static str,
    /// The referenced identifier, if the caller supplied one.
    pub uuid: Option<Uuid>,
}

/// One column of a workbook export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
}

impl ColumnSpec {
    pub fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Behavior every portal entity implements.
///
/// The associated constants pin the storage kind (also the wire segment)
/// and the sequence-code prefix; the methods declare per-entity validation
/// and export shape.
pub trait RecordFields:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Storage kind, e.g. `"crops"`.
    const KIND: &'static str;
    /// Sequence code prefix, e.g. `"CR"`.
    const SEQUENCE_PREFIX: &'static str;

    /// A value that must be unique among live records of this kind.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Relations that must reference live records.
    fn relations(&self) -> Vec<RelationRef> {
        Vec::new()
    }

    /// Column headers for workbook export, aligned with `workbook_cells`.
    fn workbook_columns() -> Vec<ColumnSpec>;

    /// One row of export cells, aligned with `workbook_columns`.
    fn workbook_cells(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> SystemColumns {
        SystemColumns {
            uuid: Uuid::from_u128(7),
            sequence_code: "XX-000001".to_string(),
            created_at: 100,
            updated_at: 100,
            deleted_at: None,
            deleted_by: None,
        }
    }

    #[test]
    fn test_not_deleted_predicate() {
        let mut row = RecordRow {
            columns: columns(),
            fields: json!({}),
        };
        assert!(not_deleted(&row));

        row.columns.deleted_at = Some(200);
        row.columns.deleted_by = Some(ActorId::new("staff-01"));
        assert!(!not_deleted(&row));
    }

    #[test]
    fn test_system_columns_wire_shape() {
        let value = serde_json::to_value(columns()).unwrap();
        // camelCase on the wire, and unset markers are absent entirely.
        assert!(value.get("sequenceCode").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("deletedAt").is_none());
    }
}
