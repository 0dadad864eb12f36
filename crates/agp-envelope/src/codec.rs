//! # Payload Codec
//!
//! Produces and consumes envelope strings.
//!
//! An envelope is three dot-separated segments:
//!
//! ```text
//! agp1.<hex(payload JSON)>.<hex(HMAC-SHA256 over payload bytes)>
//! ```
//!
//! The signature covers the exact bytes carried in the payload segment, so
//! any re-serialization ambiguity is irrelevant: what is signed is what is
//! transmitted.

use serde_json::{Map, Value};
use shared_types::{current_timestamp, Timestamp};

use crate::config::CodecConfig;
use crate::errors::EnvelopeError;
use crate::security::{compute_payload_signature, signatures_match};

/// Version prefix of every envelope string.
pub const ENVELOPE_PREFIX: &str = "agp1";

/// Reserved field stamped by the signer. Callers must never supply it.
pub const ISSUED_AT_FIELD: &str = "issuedAt";

/// Encode/decode pair for envelope strings.
///
/// Pure given its config; holds no other state.
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    config: CodecConfig,
}

impl PayloadCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Sign a payload mapping into an envelope string, stamping `issuedAt`
    /// with the current time.
    ///
    /// ## Errors
    ///
    /// - `ReservedField`: the mapping already contains `issuedAt`
    /// - `Serialization`: the combined mapping could not be serialized
    pub fn encode(&self, payload: &Map<String, Value>) -> Result<String, EnvelopeError> {
        self.encode_at(payload, current_timestamp())
    }

    /// Sign a payload mapping with an explicit `issuedAt` stamp.
    ///
    /// Exists so freshness handling can be exercised deterministically;
    /// production callers use [`encode`](Self::encode).
    pub fn encode_at(
        &self,
        payload: &Map<String, Value>,
        issued_at: Timestamp,
    ) -> Result<String, EnvelopeError> {
        if payload.contains_key(ISSUED_AT_FIELD) {
            return Err(EnvelopeError::ReservedField {
                field: ISSUED_AT_FIELD,
            });
        }

        let mut stamped = payload.clone();
        stamped.insert(ISSUED_AT_FIELD.to_string(), Value::from(issued_at));

        let bytes =
            serde_json::to_vec(&Value::Object(stamped)).map_err(|e| EnvelopeError::Serialization {
                message: e.to_string(),
            })?;

        let signature = compute_payload_signature(&self.config.secret, &bytes);

        Ok(format!(
            "{}.{}.{}",
            ENVELOPE_PREFIX,
            hex::encode(&bytes),
            hex::encode(signature)
        ))
    }

    /// Open an envelope string, verifying its signature and freshness.
    ///
    /// Returns the original mapping plus the `issuedAt` field.
    ///
    /// ## Errors
    ///
    /// - `MalformedEnvelope`: wrong segment count, unknown prefix, bad hex,
    ///   or payload not a JSON object
    /// - `IntegrityFailure`: recomputed signature does not match
    /// - `PayloadExpired` / `PayloadFromFuture`: freshness bounds violated
    pub fn decode(&self, envelope: &str) -> Result<Map<String, Value>, EnvelopeError> {
        self.decode_at(envelope, current_timestamp())
    }

    /// Open an envelope string against an explicit `now`.
    pub fn decode_at(
        &self,
        envelope: &str,
        now: Timestamp,
    ) -> Result<Map<String, Value>, EnvelopeError> {
        let segments: Vec<&str> = envelope.split('.').collect();
        if segments.len() != 3 {
            return Err(EnvelopeError::MalformedEnvelope {
                reason: format!("expected 3 segments, found {}", segments.len()),
            });
        }

        if segments[0] != ENVELOPE_PREFIX {
            return Err(EnvelopeError::MalformedEnvelope {
                reason: format!("unknown version prefix '{}'", segments[0]),
            });
        }

        let payload_bytes = hex::decode(segments[1]).map_err(|_| {
            EnvelopeError::MalformedEnvelope {
                reason: "payload segment is not hex".to_string(),
            }
        })?;

        let signature_bytes = hex::decode(segments[2]).map_err(|_| {
            EnvelopeError::MalformedEnvelope {
                reason: "signature segment is not hex".to_string(),
            }
        })?;
        let signature: [u8; 32] =
            signature_bytes
                .try_into()
                .map_err(|_| EnvelopeError::MalformedEnvelope {
                    reason: "signature segment is not 32 bytes".to_string(),
                })?;

        // Verify before parsing: tampered bytes never reach the JSON parser.
        let expected = compute_payload_signature(&self.config.secret, &payload_bytes);
        if !signatures_match(&expected, &signature) {
            return Err(EnvelopeError::IntegrityFailure);
        }

        let value: Value =
            serde_json::from_slice(&payload_bytes).map_err(|_| EnvelopeError::MalformedEnvelope {
                reason: "payload is not valid JSON".to_string(),
            })?;
        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(EnvelopeError::MalformedEnvelope {
                    reason: "payload is not a JSON object".to_string(),
                })
            }
        };

        let issued_at = map
            .get(ISSUED_AT_FIELD)
            .and_then(Value::as_u64)
            .ok_or_else(|| EnvelopeError::MalformedEnvelope {
                reason: format!("missing or non-integer '{}'", ISSUED_AT_FIELD),
            })?;

        self.check_freshness(issued_at, now)?;

        Ok(map)
    }

    fn check_freshness(&self, issued_at: Timestamp, now: Timestamp) -> Result<(), EnvelopeError> {
        if issued_at > now + self.config.max_future_skew_secs {
            return Err(EnvelopeError::PayloadFromFuture { issued_at, now });
        }

        if let Some(max_age) = self.config.max_payload_age_secs {
            let age = now.saturating_sub(issued_at);
            if age > max_age {
                return Err(EnvelopeError::PayloadExpired {
                    age_secs: age,
                    max_age,
                });
            }
        }

        Ok(())
    }
}
