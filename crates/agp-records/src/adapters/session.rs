//! # Static Session Gate
//!
//! Validates bearer tokens against a fixed table of sessions. Session
//! issuance lives outside the registry; the runtime loads operator tokens
//! from its configuration.
//!
//! SECURITY: token comparison is constant-time, and every configured token
//! is compared on every call so the lookup itself does not leak which
//! token prefix matched.

use subtle::ConstantTimeEq;

use shared_types::{Session, SessionToken};

use crate::domain::errors::SessionError;
use crate::ports::outbound::{SessionGate, TimeSource};

/// A fixed token → session table.
pub struct StaticSessionGate<TS: TimeSource> {
    sessions: Vec<(String, Session)>,
    time: TS,
}

impl<TS: TimeSource> StaticSessionGate<TS> {
    pub fn new(time: TS) -> Self {
        Self {
            sessions: Vec::new(),
            time,
        }
    }

    /// Register a token and the session it proves.
    pub fn with_session(mut self, token: impl Into<String>, session: Session) -> Self {
        self.sessions.push((token.into(), session));
        self
    }
}

impl<TS: TimeSource> SessionGate for StaticSessionGate<TS> {
    fn assert_valid(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let mut matched: Option<&Session> = None;

        // Compare against every entry; no early exit on match.
        for (candidate, session) in &self.sessions {
            if constant_time_compare(candidate, token.as_str()) {
                matched = Some(session);
            }
        }

        let session = matched.ok_or(SessionError::UnknownToken)?;

        let now = self.time.now();
        if !session.is_valid_at(now) {
            return Err(SessionError::Expired {
                expired_at: session.expires_at,
                now,
            });
        }

        Ok(session.clone())
    }
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Both inputs are padded to the longer length with different filler bytes
/// so a length mismatch still compares the full width and still fails.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ActorId;

    use crate::ports::outbound::FixedTimeSource;

    fn gate() -> StaticSessionGate<FixedTimeSource> {
        StaticSessionGate::new(FixedTimeSource::new(1_000)).with_session(
            "tok-alpha",
            Session::new(ActorId::new("staff-01"), 2_000),
        )
    }

    #[test]
    fn test_known_token_resolves_session() {
        let session = gate().assert_valid(&SessionToken::new("tok-alpha")).unwrap();
        assert_eq!(session.actor, ActorId::new("staff-01"));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let result = gate().assert_valid(&SessionToken::new("tok-beta"));
        assert_eq!(result, Err(SessionError::UnknownToken));
    }

    #[test]
    fn test_expired_session_rejected() {
        let gate = StaticSessionGate::new(FixedTimeSource::new(3_000)).with_session(
            "tok-alpha",
            Session::new(ActorId::new("staff-01"), 2_000),
        );
        let result = gate.assert_valid(&SessionToken::new("tok-alpha"));
        assert!(matches!(result, Err(SessionError::Expired { .. })));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret", "secret"));
        assert!(!constant_time_compare("secret", "Secret"));
        assert!(!constant_time_compare("secret", "secre"));
        assert!(!constant_time_compare("secret", "secrets"));
    }
}
