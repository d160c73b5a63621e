//! Opaque token generation and digests for sessions and email verification.
//!
//! Tokens are 32 random bytes rendered as 64 lowercase hex characters. The
//! plaintext goes to the client; only its SHA-256 digest is stored, so a
//! leaked database cannot be replayed against live sessions.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length in characters of a generated token (32 random bytes, hex-encoded).
pub const TOKEN_LENGTH: usize = 64;

/// Email verification tokens expire this many hours after issuance.
pub const EMAIL_TOKEN_TTL_HOURS: i64 = 24;

/// Generate a new opaque token.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute the SHA-256 hex digest of a token.
///
/// Used both when persisting a new session (to store the digest) and when
/// authenticating (to look the presented token up by digest).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}
