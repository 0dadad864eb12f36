//! # Envelope Errors
//!
//! Error types for envelope encoding and verification.

/// Envelope encode/decode errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The string is not a well-formed envelope (wrong segment count,
    /// unknown version prefix, bad hex, or payload not a JSON object).
    MalformedEnvelope { reason: String },
    /// Signature verification failed.
    IntegrityFailure,
    /// Payload is older than the configured window.
    PayloadExpired { age_secs: u64, max_age: u64 },
    /// Payload `issuedAt` is further in the future than the tolerated skew.
    PayloadFromFuture { issued_at: u64, now: u64 },
    /// Caller supplied a field the codec owns.
    ReservedField { field: &'static str },
    /// Payload could not be serialized or deserialized.
    Serialization { message: String },
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedEnvelope { reason } => {
                write!(f, "Malformed envelope: {}", reason)
            }
            Self::IntegrityFailure => write!(f, "Envelope signature verification failed"),
            Self::PayloadExpired { age_secs, max_age } => {
                write!(f, "Payload expired: age={}s, max={}s", age_secs, max_age)
            }
            Self::PayloadFromFuture { issued_at, now } => {
                write!(f, "Payload from future: issuedAt={}, now={}", issued_at, now)
            }
            Self::ReservedField { field } => {
                write!(f, "Field '{}' is reserved for the codec", field)
            }
            Self::Serialization { message } => {
                write!(f, "Payload serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}
