//! # Codec Configuration
//!
//! The shared secret and freshness bounds, passed explicitly to the codec at
//! construction time. There is no process-wide secret: every signer and
//! verifier holds a `CodecConfig`, and tests construct their own.

use shared_types::Timestamp;

/// Configuration for a `PayloadCodec`.
///
/// Signer and verifier must agree on the secret; mismatch causes every
/// verification to fail closed.
#[derive(Clone)]
pub struct CodecConfig {
    /// 32-byte symmetric key for HMAC-SHA256.
    pub secret: [u8; 32],
    /// Maximum accepted payload age in seconds. `None` disables the expiry
    /// check and accepts any `issuedAt` not in the future.
    pub max_payload_age_secs: Option<Timestamp>,
    /// Tolerated clock skew for payloads stamped slightly in the future.
    pub max_future_skew_secs: Timestamp,
}

impl CodecConfig {
    /// Create a config with the given secret, no expiry bound, and the
    /// default future-skew tolerance.
    pub fn new(secret: [u8; 32]) -> Self {
        Self {
            secret,
            max_payload_age_secs: None,
            max_future_skew_secs: 10,
        }
    }

    /// Derive a config from an arbitrary-length secret string by hashing it
    /// down to 32 bytes. Convenience for environments that configure the
    /// secret as text.
    pub fn from_secret_str(secret: &str) -> Self {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self::new(key)
    }

    /// Enable the expiry check with the given window.
    pub fn with_max_payload_age(mut self, secs: Timestamp) -> Self {
        self.max_payload_age_secs = Some(secs);
        self
    }

    /// Override the tolerated future skew.
    pub fn with_max_future_skew(mut self, secs: Timestamp) -> Self {
        self.max_future_skew_secs = secs;
        self
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in logs or panics.
        f.debug_struct("CodecConfig")
            .field("secret", &"[redacted]")
            .field("max_payload_age_secs", &self.max_payload_age_secs)
            .field("max_future_skew_secs", &self.max_future_skew_secs)
            .finish()
    }
}
