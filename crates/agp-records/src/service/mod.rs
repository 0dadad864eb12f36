//! # Record Registry Service
//!
//! The main service implementing the registry API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `RecordRegistryApi` for every catalog entity
//! 2. Owns relation, unique-key, and soft-delete rules
//! 3. Assigns every server-managed column
//! 4. Uses dependency injection for store, time, and id generation
//!
//! All standard reads pass through one live filter; persist and audit
//! append travel in one atomic store commit.


use serde_json::Value;
use shared_types::ActorId;
use uuid::Uuid;

use crate::domain::audit::{ActivityAction, ActivityEntry};
use crate::domain::entities::{
    not_deleted, ColumnSpec, RecordFields, RecordRow, StoredRecord, SystemColumns,
};
use crate::domain::errors::RegistryError;
use crate::ports::inbound::RecordRegistryApi;
use crate::ports::outbound::{
    IdGenerator, InMemoryRecordStore, RecordStore, StoreOperation, SystemTimeSource, TimeSource,
    UuidGenerator, WorkbookRenderer,
};

/// Registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Hard cap on rows returned by a list operation.
    pub max_query_limit: usize,
    /// Zero-padded width of the numeric part of sequence codes.
    pub sequence_pad_width: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_query_limit: 500,
            sequence_pad_width: 6,
        }
    }
}

/// The Record Registry Service.
pub struct RecordService<ST, TS, ID>
where
    ST: RecordStore,
    TS: TimeSource,
    ID: IdGenerator,
{
    /// Record persistence.
    pub(crate) store: ST,
    /// Time source for server-generated timestamps.
    pub(crate) time: TS,
    /// Identifier generation.
    pub(crate) ids: ID,
    /// Service configuration.
    pub(crate) config: RegistryConfig,
}

impl RecordService<InMemoryRecordStore, SystemTimeSource, UuidGenerator> {
    /// Create a service with in-memory adapters.
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::new(
            InMemoryRecordStore::new(),
            SystemTimeSource,
            UuidGenerator,
            config,
        )
    }
}

impl<ST, TS, ID> RecordService<ST, TS, ID>
where
    ST: RecordStore,
    TS: TimeSource,
    ID: IdGenerator,
{
    pub fn new(store: ST, time: TS, ids: ID, config: RegistryConfig) -> Self {
        Self {
            store,
            time,
            ids,
            config,
        }
    }

    pub fn store(&self) -> &ST {
        &self.store
    }

    /// Activity entries for an entity kind. Verification accessor.
    pub fn activity_for(&self, kind: &str) -> Result<Vec<ActivityEntry>, RegistryError> {
        Ok(self.store.activity(kind)?)
    }

    /// Every live row of a kind. The sole application of the soft-delete
    /// filter; read paths must not re-derive it.
    fn live_rows(&self, kind: &str) -> Result<Vec<RecordRow>, RegistryError> {
        Ok(self
            .store
            .fetch_all(kind)?
            .into_iter()
            .filter(not_deleted)
            .collect())
    }

    /// A live row by identifier, or `NotFound`.
    fn live_row<F: RecordFields>(&self, uuid: Uuid) -> Result<RecordRow, RegistryError> {
        self.store
            .fetch(F::KIND, &uuid)?
            .filter(not_deleted)
            .ok_or(RegistryError::NotFound {
                kind: F::KIND,
                uuid,
            })
    }

    /// Every declared relation must reference a live record.
    fn assert_relations<F: RecordFields>(&self, fields: &F) -> Result<(), RegistryError> {
        for relation in fields.relations() {
            let uuid = relation
                .uuid
                .ok_or(RegistryError::MissingRelation {
                    field: relation.field,
                })?;

            let target = self.store.fetch(relation.kind, &uuid)?;
            if !target.as_ref().is_some_and(not_deleted) {
                return Err(RegistryError::RelationNotFound {
                    field: relation.field,
                    kind: relation.kind,
                    uuid,
                });
            }
        }
        Ok(())
    }

    /// The unique key, if declared, must not be held by another live row.
    fn assert_unique_key<F: RecordFields>(
        &self,
        fields: &F,
        exclude: Option<Uuid>,
    ) -> Result<(), RegistryError> {
        let Some(key) = fields.unique_key() else {
            return Ok(());
        };

        for row in self.live_rows(F::KIND)? {
            if Some(row.columns.uuid) == exclude {
                continue;
            }
            let existing = row.into_typed::<F>().map_err(invalid_fields)?;
            if existing.fields.unique_key().as_deref() == Some(key.as_str()) {
                return Err(RegistryError::DuplicateUniqueKey {
                    kind: F::KIND,
                    key,
                });
            }
        }
        Ok(())
    }

    fn sequence_code<F: RecordFields>(&mut self) -> Result<String, RegistryError> {
        let number = self.store.next_sequence(F::KIND)?;
        Ok(format!(
            "{}-{:0width$}",
            F::SEQUENCE_PREFIX,
            number,
            width = self.config.sequence_pad_width
        ))
    }
}

fn invalid_fields(err: serde_json::Error) -> RegistryError {
    RegistryError::InvalidFields {
        message: err.to_string(),
    }
}

fn to_fields_value<F: RecordFields>(fields: &F) -> Result<Value, RegistryError> {
    serde_json::to_value(fields).map_err(invalid_fields)
}

impl<ST, TS, ID> RecordRegistryApi for RecordService<ST, TS, ID>
where
    ST: RecordStore,
    TS: TimeSource,
    ID: IdGenerator,
{
    fn create<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        fields: F,
    ) -> Result<SystemColumns, RegistryError> {
        self.assert_relations(&fields)?;
        self.assert_unique_key(&fields, None)?;

        let now = self.time.now();
        let columns = SystemColumns {
            uuid: self.ids.next_uuid(),
            sequence_code: self.sequence_code::<F>()?,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        };

        let row = RecordRow {
            columns: columns.clone(),
            fields: to_fields_value(&fields)?,
        };

        let entry = ActivityEntry::new(
            actor.clone(),
            ActivityAction::Created,
            F::KIND,
            Some(columns.uuid),
            now,
        );

        self.store.commit(vec![
            StoreOperation::put_record(F::KIND, row),
            StoreOperation::append_activity(entry),
        ])?;

        tracing::debug!(
            "[agp-records] created {} {} ({})",
            F::KIND,
            columns.sequence_code,
            columns.uuid
        );
        Ok(columns)
    }

    fn update<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        uuid: Uuid,
        fields: F,
    ) -> Result<SystemColumns, RegistryError> {
        let existing = self.live_row::<F>(uuid)?;

        self.assert_relations(&fields)?;
        self.assert_unique_key(&fields, Some(uuid))?;

        // Server columns are carried over; the caller's payload cannot have
        // contained any, and updated_at is stamped here.
        let mut columns = existing.columns;
        columns.updated_at = self.time.now();

        let row = RecordRow {
            columns: columns.clone(),
            fields: to_fields_value(&fields)?,
        };

        let entry = ActivityEntry::new(
            actor.clone(),
            ActivityAction::Updated,
            F::KIND,
            Some(uuid),
            columns.updated_at,
        );

        self.store.commit(vec![
            StoreOperation::put_record(F::KIND, row),
            StoreOperation::append_activity(entry),
        ])?;

        tracing::debug!("[agp-records] updated {} {}", F::KIND, uuid);
        Ok(columns)
    }

    fn soft_delete<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        uuid: Uuid,
    ) -> Result<SystemColumns, RegistryError> {
        let existing = self.live_row::<F>(uuid)?;

        // Snapshot the full prior state for the audit trail.
        let previous = serde_json::to_value(&existing).map_err(invalid_fields)?;

        let now = self.time.now();
        let mut row = existing;
        row.columns.deleted_at = Some(now);
        row.columns.deleted_by = Some(actor.clone());
        row.columns.updated_at = now;
        let columns = row.columns.clone();

        let entry = ActivityEntry::new(
            actor.clone(),
            ActivityAction::Deleted,
            F::KIND,
            Some(uuid),
            now,
        )
        .with_previous(previous);

        self.store.commit(vec![
            StoreOperation::put_record(F::KIND, row),
            StoreOperation::append_activity(entry),
        ])?;

        tracing::debug!("[agp-records] soft-deleted {} {}", F::KIND, uuid);
        Ok(columns)
    }

    fn list<F: RecordFields>(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<StoredRecord<F>>, RegistryError> {
        let mut rows = self.live_rows(F::KIND)?;

        // Newest entries first; sequence code breaks created_at ties.
        rows.sort_by(|a, b| {
            (b.columns.created_at, &b.columns.sequence_code)
                .cmp(&(a.columns.created_at, &a.columns.sequence_code))
        });

        let cap = limit
            .unwrap_or(self.config.max_query_limit)
            .min(self.config.max_query_limit);

        rows.into_iter()
            .take(cap)
            .map(|row| row.into_typed::<F>().map_err(invalid_fields))
            .collect()
    }

    fn fetch_any<F: RecordFields>(&self, uuid: Uuid) -> Result<StoredRecord<F>, RegistryError> {
        // Deliberate bypass of the live filter.
        self.store
            .fetch(F::KIND, &uuid)?
            .ok_or(RegistryError::NotFound {
                kind: F::KIND,
                uuid,
            })?
            .into_typed::<F>()
            .map_err(invalid_fields)
    }

    fn count<F: RecordFields>(&self) -> Result<usize, RegistryError> {
        Ok(self.live_rows(F::KIND)?.len())
    }

    fn export_workbook<F: RecordFields>(
        &mut self,
        actor: &ActorId,
        renderer: &dyn WorkbookRenderer,
    ) -> Result<Vec<u8>, RegistryError> {
        let records = self.list::<F>(None)?;

        let mut columns = vec![ColumnSpec::new("Sequence Code")];
        columns.extend(F::workbook_columns());
        columns.push(ColumnSpec::new("Created At"));

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                let mut cells = vec![record.columns.sequence_code.clone()];
                cells.extend(record.fields.workbook_cells());
                cells.push(record.columns.created_at.to_string());
                cells
            })
            .collect();

        let bytes = renderer.render_workbook(&columns, &rows)?;

        let entry = ActivityEntry::new(
            actor.clone(),
            ActivityAction::Exported,
            F::KIND,
            None,
            self.time.now(),
        );
        self.store
            .commit(vec![StoreOperation::append_activity(entry)])?;

        tracing::debug!(
            "[agp-records] exported {} {} rows",
            F::KIND,
            records.len()
        );
        Ok(bytes)
    }
}
