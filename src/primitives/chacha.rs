//! Raw ChaCha20 keystream XOR.
//!
//! ERIS never uses the Poly1305 tag: block authenticity comes from the
//! BLAKE2b reference, not from an AEAD tag. We only need the bare
//! stream cipher, so we wrap `chacha20::ChaCha20` directly instead of
//! the `chacha20poly1305` AEAD construction.

use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};

/// Block-aligned counter advancement: one ChaCha20 block is 64 bytes.
const BLOCK_LEN: u64 = 64;

/// XOR `data` in place with the ChaCha20 keystream for `key`/`nonce`
/// starting at the given block `counter`.
///
/// Returns the counter the stream would be at after consuming
/// `data.len()` bytes, so callers that stream across multiple calls
/// can resume correctly. ERIS only ever encrypts whole blocks in one
/// shot (counter 0), but the counter is threaded through to keep the
/// primitive honest about its real contract.
pub fn chacha20_xor(key: &[u8; 32], nonce: &[u8; 12], counter: u32, data: &mut [u8]) -> u32 {
    let mut cipher = ChaCha20::new(key.into(), nonce.into());
    cipher.seek(u64::from(counter) * BLOCK_LEN);
    cipher.apply_keystream(data);

    let consumed_blocks = data.len().div_ceil(BLOCK_LEN as usize) as u32;
    counter + consumed_blocks
}

/// Build the 12-byte nonce used for a node at the given tree level.
///
/// All-zero except the last byte, which carries the level (0 for
/// leaves). This domain-separates nonces across levels so identical
/// interior content at different levels never reuses a keystream.
#[must_use]
pub fn level_nonce(level: u8) -> [u8; 12] {
    let mut nonce = [0u8; 12];
    nonce[11] = level;
    nonce
}
