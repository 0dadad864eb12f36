//! # Inbound Port (Driving Port)
//!
//! The primary API of the record registry. The resolver shell is its only
//! production caller; tests drive it directly.

use shared_types::ActorId;
use uuid::Uuid;

use crate::domain::entities::{RecordFields, StoredRecord, SystemColumns};
use crate::domain::errors::RegistryError;
use crate::ports::outbound::WorkbookRenderer;

/// Entity-generic registry operations.
///
/// Implementations must enforce the domain rules: server-assigned columns,
/// the centralized live filter, relation and unique-key validation, and the
/// atomic record-plus-audit commit.
pub trait RecordRegistryApi {
    /// Create a record.
    ///
    /// Validates declared relations and the unique key among live rows,
    /// assigns uuid, sequence code, and timestamps, then commits the row
    /// together with its `created` activity entry.
    ///
    /// ## Errors
    ///
    /// - `MissingRelation` / `RelationNotFound`: relation precondition failed
    /// - `DuplicateUniqueKey`: unique key held by another live record
    fn create<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        fields: F,
    ) -> Result<SystemColumns, RegistryError>;

    /// Replace a live record's fields.
    ///
    /// The fields value is the complete caller-writable state; system
    /// columns are preserved except `updated_at`, which is always
    /// server-generated.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no live record with this identifier
    /// - `MissingRelation` / `RelationNotFound` / `DuplicateUniqueKey`
    fn update<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        uuid: Uuid,
        fields: F,
    ) -> Result<SystemColumns, RegistryError>;

    /// Soft-delete a live record.
    ///
    /// Sets the deletion markers and commits the row together with a
    /// `deleted` activity entry carrying the full prior state. Rows are
    /// never removed.
    fn soft_delete<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        uuid: Uuid,
    ) -> Result<SystemColumns, RegistryError>;

    /// List live records, newest sequence first, capped by the configured
    /// query limit.
    fn list<F: RecordFields>(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<StoredRecord<F>>, RegistryError>;

    /// Fetch a record by identifier, bypassing the live filter.
    ///
    /// The one sanctioned bypass of the soft-delete predicate; deleted
    /// records come back with their markers set. Used for audit review.
    fn fetch_any<F: RecordFields>(&self, uuid: Uuid) -> Result<StoredRecord<F>, RegistryError>;

    /// Count live records.
    fn count<F: RecordFields>(&self) -> Result<usize, RegistryError>;

    /// Render all live records of a kind through the workbook collaborator,
    /// logging an `exported` activity entry.
    fn export_workbook<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        renderer: &dyn WorkbookRenderer,
    ) -> Result<Vec<u8>, RegistryError>;
}
