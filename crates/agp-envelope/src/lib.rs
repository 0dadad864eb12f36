//! # Payload Envelope (agp-envelope)
//!
//! The signed-payload transport used by every portal operation. A request's
//! fields never travel as typed parameters; they are serialized, signed with
//! the shared portal secret, and carried as one opaque string:
//!
//! ```text
//! caller fields ──encode──→ "agp1.<hex payload>.<hex signature>" ──┐
//!                                                                  │ transport
//! business logic ←──open/decode (verify + expiry check) ←──────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Integrity**: HMAC-SHA256 over the payload bytes; verification uses a
//!   constant-time comparison.
//! - **Freshness**: an `issuedAt` stamp is added at signing time and may be
//!   bounded by a maximum age at decode time.
//! - **Reserved field**: `issuedAt` is owned by the codec. Callers cannot
//!   supply it; verifiers always surface it back alongside the payload.
//!
//! ## Modules
//!
//! - `config`: `CodecConfig` (secret + freshness window)
//! - `codec`: `PayloadCodec` encode/decode over JSON objects
//! - `signed`: `Signed<T>` typed wrapper over the codec
//! - `security`: signature computation and constant-time verification
//! - `errors`: `EnvelopeError` enum

mod codec;
mod config;
mod errors;
mod security;
mod signed;

pub use codec::{PayloadCodec, ENVELOPE_PREFIX, ISSUED_AT_FIELD};
pub use config::CodecConfig;
pub use errors::EnvelopeError;
pub use security::{compute_payload_signature, signatures_match};
pub use signed::Signed;
