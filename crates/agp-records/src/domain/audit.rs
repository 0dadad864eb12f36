//! # Activity Log Entries
//!
//! Append-only audit records written in the same atomic commit as the
//! record mutation they describe. There is no read path in the portal API;
//! the accessor on the store exists for verification.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ActorId, Timestamp};
use uuid::Uuid;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Exported,
}

/// One activity-log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Operator who performed the action.
    pub actor: ActorId,
    pub action: ActivityAction,
    /// Entity kind the action applied to.
    pub entity_kind: String,
    /// Record the action applied to; absent for bulk actions like export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_uuid: Option<Uuid>,
    pub at: Timestamp,
    /// Full prior state, captured before destructive changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
}

impl ActivityEntry {
    pub fn new(
        actor: ActorId,
        action: ActivityAction,
        entity_kind: &str,
        record_uuid: Option<Uuid>,
        at: Timestamp,
    ) -> Self {
        Self {
            actor,
            action,
            entity_kind: entity_kind.to_string(),
            record_uuid,
            at,
            previous: None,
        }
    }

    /// Attach the prior state snapshot.
    pub fn with_previous(mut self, previous: Value) -> Self {
        self.previous = Some(previous);
        self
    }
}
