//! # Record Registry (agp-records)
//!
//! The record-keeping subsystem of the AgriPortal back end: entity-generic
//! CRUD with soft deletion, an append-only activity log, workbook export,
//! and the envelope-facing resolver shell.
//!
//! ## Request flow
//!
//! ```text
//! "agp1.<hex>.<hex>" ──→ Resolver Shell ──→ Registry Service ──→ Record Store
//!       (envelope)        open envelope       relations, keys      atomic commit:
//!                         validate session    sequence codes       record + audit
//!                         typed payloads      soft-delete filter
//! ```
//!
//! ## Domain Rules
//!
//! | Rule | Description |
//! |------|-------------|
//! | Server columns | uuid, sequence code, and timestamps are never caller-supplied |
//! | Soft delete | deletion sets markers; rows are never removed |
//! | Live filter | every standard read excludes deleted rows via one predicate |
//! | Relations | declared relations must reference live records |
//! | Unique keys | enforced among live rows only; deleted keys are reusable |
//! | Audit | record write and activity append commit atomically |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - entities, catalog, audit entries, errors
//! - `ports/` - port traits (inbound API, outbound SPI) and test adapters
//! - `adapters/` - file-backed store, session gate, workbook renderer
//! - `service/` - the registry service implementing the API
//! - `resolver/` - envelope-facing operation shell
//!
//! ## Usage
//!
//! ```ignore
//! use agp_records::{RecordResolver, RecordService, RegistryConfig};
//!
//! let service = RecordService::in_memory(RegistryConfig::default());
//! let mut resolver = RecordResolver::new(service, codec, gate);
//!
//! let receipt = resolver.create::<CropRecord>(&tokenized)?;
//! let sealed_rows = resolver.list::<CropRecord>(&tokenized)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod resolver;
pub mod service;

// Re-export key types for convenience
pub use domain::audit::{ActivityAction, ActivityEntry};
pub use domain::catalog::{
    BiosecurityCheck, CropRecord, FarmRecord, LivestockRecord, ProductionRecord,
};
pub use domain::entities::{
    not_deleted, ColumnSpec, RecordFields, RecordRow, RelationRef, StoredRecord, SystemColumns,
};
pub use domain::errors::{RegistryError, SessionError, StoreError, WorkbookError};
pub use ports::inbound::RecordRegistryApi;
pub use ports::outbound::{
    IdGenerator, InMemoryRecordStore, RecordStore, SequentialIdGenerator, SessionGate,
    StoreOperation, SystemTimeSource, TimeSource, UuidGenerator, WorkbookRenderer,
};
pub use resolver::payloads::{MutationReceipt, QueryResult, RecordView};
pub use resolver::RecordResolver;
pub use service::{RecordService, RegistryConfig};

// Re-export adapter implementations
pub use adapters::file_store::FileBackedRecordStore;
pub use adapters::session::StaticSessionGate;
pub use adapters::workbook::CsvWorkbookRenderer;
