//! CBOR tag 276 marshalling of a capability (spec §6): the 66-byte
//! binary form wrapped as a tagged CBOR byte string, so a capability
//! can travel inside a larger CBOR document without a side channel for
//! its type.

use serde_cbor::Value;

use super::{CAP_LEN, CapabilityError, ErisCap, Result};

/// IANA-registered CBOR tag for an ERIS read capability.
pub const TAG: u64 = 276;

/// Wrap a capability as a CBOR tag-276 byte string.
#[must_use]
pub fn to_cbor(cap: ErisCap) -> Vec<u8> {
    let tagged = Value::Tag(TAG, Box::new(Value::Bytes(cap.to_bytes().to_vec())));
    serde_cbor::to_vec(&tagged).expect("capability CBOR encoding is infallible")
}

/// Parse a capability from a CBOR tag-276 byte string.
///
/// # Errors
///
/// Returns [`CapabilityError::InvalidCbor`] if `bytes` is not valid
/// CBOR or is not a tag-276 value, or [`CapabilityError::WrongPayloadLen`]
/// if the tagged byte string isn't exactly 66 bytes.
pub fn from_cbor(bytes: &[u8]) -> Result<ErisCap> {
    let value: Value =
        serde_cbor::from_slice(bytes).map_err(|e| CapabilityError::InvalidCbor(e.to_string()))?;

    let Value::Tag(TAG, inner) = value else {
        return Err(CapabilityError::InvalidCbor(format!(
            "expected CBOR tag {TAG}"
        )));
    };
    let Value::Bytes(payload) = *inner else {
        return Err(CapabilityError::InvalidCbor(
            "tag 276 must wrap a byte string".to_string(),
        ));
    };
    if payload.len() != CAP_LEN {
        return Err(CapabilityError::WrongPayloadLen(payload.len()));
    }
    ErisCap::from_bytes(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::BlockSize;
    use crate::codec::{Key, Pair, Reference};

    fn sample_cap() -> ErisCap {
        ErisCap::new(
            BlockSize::Small,
            1,
            Pair::new(Reference([0x33; 32]), Key([0x44; 32])),
        )
    }

    #[test]
    fn cbor_roundtrip() {
        let cap = sample_cap();
        let bytes = to_cbor(cap);
        assert_eq!(from_cbor(&bytes).unwrap(), cap);
    }

    #[test]
    fn cbor_carries_tag_276() {
        let bytes = to_cbor(sample_cap());
        let value: Value = serde_cbor::from_slice(&bytes).unwrap();
        match value {
            Value::Tag(tag, _) => assert_eq!(tag, TAG),
            other => panic!("expected a tagged value, got {other:?}"),
        }
    }

    #[test]
    fn untagged_value_is_rejected() {
        let untagged = Value::Bytes(sample_cap().to_bytes().to_vec());
        let bytes = serde_cbor::to_vec(&untagged).unwrap();
        assert!(from_cbor(&bytes).is_err());
    }

    #[test]
    fn wrong_payload_len_is_rejected() {
        let tagged = Value::Tag(TAG, Box::new(Value::Bytes(vec![0u8; 10])));
        let bytes = serde_cbor::to_vec(&tagged).unwrap();
        assert_eq!(from_cbor(&bytes), Err(CapabilityError::WrongPayloadLen(10)));
    }
}
