//! # Session Types
//!
//! A validated session and the opaque token that proves it. Session issuance
//! is out of scope for the registry; these are the shapes every resolver
//! precondition check consumes.

use crate::actor::ActorId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Opaque bearer token presented inside a signed payload.
///
/// Compared in constant time by the session gate; never logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A resolved, not-yet-expired session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The operator this session belongs to.
    pub actor: ActorId,
    /// Unix timestamp after which the session is invalid.
    pub expires_at: Timestamp,
}

impl Session {
    pub fn new(actor: ActorId, expires_at: Timestamp) -> Self {
        Self { actor, expires_at }
    }

    /// Whether the session is still valid at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_boundary() {
        let session = Session::new(ActorId::new("staff-01"), 1000);
        assert!(session.is_valid_at(999));
        assert!(!session.is_valid_at(1000));
        assert!(!session.is_valid_at(1001));
    }
}
