//! BLAKE2b-256, keyed or unkeyed.
//!
//! RFC 7693 allows a key of up to 64 bytes baked into the compression
//! parameters; a zero-length key is the unkeyed mode. We expose a
//! single function covering both, since ERIS only ever distinguishes
//! "keyed with the Secret" (leaf convergence) from "keyed with the
//! all-zero Secret" (node convergence) — never truly unkeyed, except
//! for reference derivation over ciphertext, which also fits the
//! zero-length-key case.

use blake2::Blake2bMac;
use blake2::digest::{Mac, consts::U32};

/// BLAKE2b with 32-byte output.
type Blake2b256Mac = Blake2bMac<U32>;

/// `BLAKE2b-256(key, data) -> 32 bytes`.
///
/// # Panics
///
/// Panics if `key` is longer than 64 bytes; ERIS never constructs a
/// key longer than 32 bytes (a [`crate::codec::Secret`] or an all-zero
/// placeholder), so this is an invariant violation, not a runtime
/// condition callers need to handle.
#[must_use]
pub fn blake2b_256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac =
        Blake2b256Mac::new_from_slice(key).expect("BLAKE2b key must be at most 64 bytes");
    Mac::update(&mut mac, data);
    mac.finalize().into_bytes().into()
}
