//! # Typed Envelope
//!
//! `Signed<T>` is the typed face of the codec: each operation declares the
//! shape it expects, and opening an envelope yields that shape directly
//! instead of an untyped mapping. Fields outside `T` (including any
//! server-managed columns a stale client embedded) are dropped during
//! deserialization, and the codec-owned `issuedAt` stamp is surfaced
//! separately so business logic never sees it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_types::Timestamp;

use crate::codec::{PayloadCodec, ISSUED_AT_FIELD};
use crate::errors::EnvelopeError;

/// A verified payload of a known shape, plus its signing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed<T> {
    /// The decoded payload.
    pub payload: T,
    /// When the envelope was signed.
    pub issued_at: Timestamp,
}

impl<T: Serialize> Signed<T> {
    /// Serialize and sign a typed payload into an envelope string.
    ///
    /// The payload must serialize to a JSON object.
    pub fn seal(payload: &T, codec: &PayloadCodec) -> Result<String, EnvelopeError> {
        let value = serde_json::to_value(payload).map_err(|e| EnvelopeError::Serialization {
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => codec.encode(&map),
            _ => Err(EnvelopeError::Serialization {
                message: "typed payload must serialize to a JSON object".to_string(),
            }),
        }
    }
}

impl<T: DeserializeOwned> Signed<T> {
    /// Open and verify an envelope string into a typed payload.
    pub fn open(envelope: &str, codec: &PayloadCodec) -> Result<Self, EnvelopeError> {
        let mut map = codec.decode(envelope)?;

        let issued_at = map
            .remove(ISSUED_AT_FIELD)
            .and_then(|v| v.as_u64())
            .unwrap_or_default();

        let payload =
            serde_json::from_value(Value::Object(map)).map_err(|e| EnvelopeError::Serialization {
                message: e.to_string(),
            })?;

        Ok(Self { payload, issued_at })
    }
}
