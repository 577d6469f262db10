//! URN text form of a capability: `urn:erisx3:<base32 payload>`.
//!
//! The base32 codec itself is treated as a pure helper (spec §1): we
//! lean on the `base32` crate's unpadded RFC 4648 alphabet rather than
//! hand-rolling the bit-packing.

use base32::Alphabet;

use super::{CAP_LEN, CapabilityError, ErisCap, Result};

const ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Number of base32 characters the 66-byte payload encodes to.
pub const URN_PAYLOAD_LEN: usize = 106;

/// The spec's doc comment says `urn:erisx2:`; the code (and this
/// implementation) emits `urn:erisx3:`, which is authoritative
/// (spec §9 open questions).
const PREFIX: &str = "urn:erisx3:";

/// Format a capability as its URN.
#[must_use]
pub fn to_urn(cap: ErisCap) -> String {
    let payload = base32::encode(ALPHABET, &cap.to_bytes());
    debug_assert_eq!(payload.len(), URN_PAYLOAD_LEN);
    format!("{PREFIX}{payload}")
}

/// Parse a URN back into a capability.
///
/// Accepts exactly 3 colon-separated parts with the first two equal
/// to `urn` and `erisx3`, and a base32 payload of at least 106
/// characters (only the first 106 are decoded).
///
/// # Errors
///
/// Returns [`CapabilityError::MalformedUrn`] for a bad prefix or a
/// too-short payload, or propagates [`CapabilityError`] from the
/// underlying binary parse.
pub fn from_urn(urn: &str) -> Result<ErisCap> {
    let parts: Vec<&str> = urn.split(':').collect();
    let [scheme, nid, payload] = parts[..] else {
        return Err(CapabilityError::MalformedUrn(format!(
            "expected exactly 3 colon-separated parts, got {}",
            parts.len()
        )));
    };
    if scheme != "urn" || nid != "erisx3" {
        return Err(CapabilityError::MalformedUrn(format!(
            "expected prefix 'urn:erisx3:', got '{scheme}:{nid}:'"
        )));
    }
    if payload.len() < URN_PAYLOAD_LEN {
        return Err(CapabilityError::MalformedUrn(format!(
            "base32 payload is {} characters, expected at least {URN_PAYLOAD_LEN}",
            payload.len()
        )));
    }

    let truncated = &payload[..URN_PAYLOAD_LEN];
    let bytes = base32::decode(ALPHABET, truncated).ok_or_else(|| {
        CapabilityError::MalformedUrn("payload is not valid base32".to_string())
    })?;

    if bytes.len() != CAP_LEN {
        return Err(CapabilityError::WrongPayloadLen(bytes.len()));
    }
    ErisCap::from_bytes(&bytes)
}
