//! # Operation Payloads
//!
//! The typed shapes that travel inside envelope strings. Every field an
//! operation needs — session token, identifiers, record fields — rides in
//! the payload; nothing travels as a separate parameter.
//!
//! Request shapes deliberately contain no server-managed columns, so a
//! stale client embedding them sees those keys dropped at decode time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{SessionToken, Timestamp};
use uuid::Uuid;

use crate::domain::entities::{StoredRecord, SystemColumns};

/// Create: session plus the caller-writable record fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest<F> {
    pub token: SessionToken,
    pub record: F,
}

/// Update: the target identifier rides inside the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest<F> {
    pub token: SessionToken,
    pub uuid: Uuid,
    pub record: F,
}

/// Soft delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub token: SessionToken,
    pub uuid: Uuid,
}

/// List live records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub token: SessionToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Export live records as a workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub token: SessionToken,
}

/// Mutation outcome returned as plain JSON (only bulk reads re-envelope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationReceipt {
    pub status: String,
    pub uuid: Uuid,
    pub sequence_code: String,
}

impl MutationReceipt {
    pub fn success(columns: &SystemColumns) -> Self {
        Self {
            status: "success".to_string(),
            uuid: columns.uuid,
            sequence_code: columns.sequence_code.clone(),
        }
    }
}

/// One record as it appears in a sealed query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView<F> {
    pub uuid: Uuid,
    pub sequence_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub record: F,
}

impl<F> From<StoredRecord<F>> for RecordView<F> {
    fn from(stored: StoredRecord<F>) -> Self {
        Self {
            uuid: stored.columns.uuid,
            sequence_code: stored.columns.sequence_code,
            created_at: stored.columns.created_at,
            updated_at: stored.columns.updated_at,
            record: stored.fields,
        }
    }
}

/// The sealed shape of a bulk read: `{ "queryResult": [ ... ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "F: Serialize",
    deserialize = "F: DeserializeOwned"
))]
pub struct QueryResult<F> {
    pub query_result: Vec<RecordView<F>>,
}
