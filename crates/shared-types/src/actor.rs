//! # Actor Identity
//!
//! The authenticated principal behind a portal operation. Every mutation and
//! every activity-log entry carries one.

use serde::{Deserialize, Serialize};

/// Identifier of the authenticated operator performing an operation.
///
/// The registry treats this as opaque; it is whatever the session layer
/// resolved the token to (a staff id, a department account, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
