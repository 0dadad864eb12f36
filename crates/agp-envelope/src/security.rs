//! # Envelope Security
//!
//! Signature computation and verification for envelope strings.
//!
//! ## Security Invariants
//!
//! - **HMAC Signature**: every envelope is authenticated via HMAC-SHA256
//!   over the exact payload bytes that travel in the envelope.
//! - **Constant-Time Verification**: signature comparison leaks no timing
//!   information about how many bytes matched.

use subtle::ConstantTimeEq;

/// Compute the HMAC-SHA256 signature over payload bytes.
pub fn compute_payload_signature(secret: &[u8; 32], payload: &[u8]) -> [u8; 32] {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC key size is always valid");
    mac.update(payload);

    let result = mac.finalize();
    let bytes = result.into_bytes();
    let mut sig = [0u8; 32];
    sig.copy_from_slice(&bytes);
    sig
}

/// Constant-time equality of two signatures.
pub fn signatures_match(expected: &[u8; 32], actual: &[u8; 32]) -> bool {
    expected.ct_eq(actual).into()
}
