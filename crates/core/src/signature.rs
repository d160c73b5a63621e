//! Stripe webhook signature verification (`Stripe-Signature`, v1 scheme).
//!
//! The header carries a signed timestamp and one or more hex HMAC-SHA256
//! signatures over `"{timestamp}.{raw body}"`. Verification must happen on
//! the raw request bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::Timestamp;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted clock skew between the signed timestamp and now, in
/// seconds. Payloads older (or newer) than this are rejected to blunt
/// replay of captured webhook deliveries.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Parsed `Stripe-Signature` header.
///
/// Multiple `v1` entries appear while a signing secret is being rotated;
/// any one of them matching is sufficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<String>,
}

/// Parse a `Stripe-Signature` header value.
///
/// The format is comma-separated `key=value` pairs, e.g.
/// `t=1716400000,v1=5257a8...`. Unknown keys are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, String> {
    let mut timestamp: Option<i64> = None;
    let mut v1_signatures: Vec<String> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => v1_signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| "signature header has no valid timestamp".to_string())?;
    if v1_signatures.is_empty() {
        return Err("signature header has no v1 signature".to_string());
    }

    Ok(SignatureHeader {
        timestamp,
        v1_signatures,
    })
}

/// Compute the hex v1 signature for a timestamp and raw payload.
///
/// Exposed so callers constructing outbound test deliveries can produce
/// headers that [`verify_signature`] accepts.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a raw webhook body against its `Stripe-Signature` header.
///
/// Checks the timestamp tolerance first, then compares each presented `v1`
/// signature against the expected HMAC in constant time. Returns a
/// human-readable reason on failure; callers map any failure to a 400.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    now: Timestamp,
) -> Result<(), String> {
    let parsed = parse_signature_header(header)?;

    let age_secs = now.timestamp() - parsed.timestamp;
    if age_secs.abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(format!(
            "signature timestamp outside tolerance ({age_secs}s)"
        ));
    }

    for candidate in &parsed.v1_signatures {
        let Some(candidate_bytes) = hex::decode(candidate) else {
            continue;
        };
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(parsed.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        // Mac::verify_slice is constant-time.
        if mac.verify_slice(&candidate_bytes).is_ok() {
            return Ok(());
        }
    }

    Err("no v1 signature matched the payload".to_string())
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string. Returns `None` for odd lengths or non-hex input.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if !s.is_ascii() || s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
