//! Block-pair types, padding, and leaf/node encryption.
//!
//! This module is the cryptographic heart of ERIS: it turns a
//! `block_size`-length plaintext buffer into ciphertext plus the
//! `(reference, key)` handle needed to fetch and decrypt it again, and
//! back. Everything here is pure — no I/O, no store.

use std::fmt;

use crate::capability::BlockSize;
use crate::primitives::{blake2b_256, chacha::level_nonce, chacha20_xor};

/// 32-byte BLAKE2b-256 digest of a stored ciphertext block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Reference(pub [u8; 32]);

/// 32-byte per-block decryption key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key(pub [u8; 32]);

/// 32-byte convergence salt. The all-zero value is the public
/// convergence mode (spec §3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Secret(pub [u8; 32]);

impl Secret {
    /// The public convergence mode: no secret at all.
    #[must_use]
    pub const fn public() -> Self {
        Self([0u8; 32])
    }
}

macro_rules! hex32 {
    ($name:ident) => {
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ")")
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

hex32!(Reference);
hex32!(Key);
hex32!(Secret);

/// Size in bytes of a packed `Reference ‖ Key` pair.
pub const PAIR_LEN: usize = 64;

/// `(Reference, Key)`: the handle needed to fetch and decrypt one
/// block. The concatenation `reference ‖ key` is exactly 64 bytes and
/// is copied byte-for-byte into node blocks — the pair order inside a
/// node block *is* the tree order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pair {
    pub reference: Reference,
    pub key: Key,
}

impl Pair {
    #[must_use]
    pub fn new(reference: Reference, key: Key) -> Self {
        Self { reference, key }
    }

    /// Pack into the 64-byte on-disk image (`reference ‖ key`).
    #[must_use]
    pub fn to_bytes(self) -> [u8; PAIR_LEN] {
        let mut out = [0u8; PAIR_LEN];
        out[..32].copy_from_slice(&self.reference.0);
        out[32..].copy_from_slice(&self.key.0);
        out
    }

    /// Unpack from a 64-byte slice image.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly 64 bytes long.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), PAIR_LEN, "a pair image is always 64 bytes");
        let mut reference = [0u8; 32];
        let mut key = [0u8; 32];
        reference.copy_from_slice(&bytes[..32]);
        key.copy_from_slice(&bytes[32..]);
        Self {
            reference: Reference(reference),
            key: Key(key),
        }
    }

    /// A pair is child-present iff its 64-byte image is not entirely
    /// zero (spec §3 tree invariants).
    #[must_use]
    pub fn is_present(self) -> bool {
        self.to_bytes() != [0u8; PAIR_LEN]
    }
}

/// Errors arising from the padding/encryption/verification layer.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("leaf padding sentinel is corrupted: expected 0x80, found a non-zero, non-sentinel byte")]
    BadPaddingSentinel,
    #[error("fetched block does not hash to its expected reference")]
    ReferenceMismatch,
    #[error("buffer length {0} is neither 1024 nor 32768 bytes")]
    WrongBlockLen(usize),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Pad a leaf's plaintext in place: write `0x80` at `content_len`, then
/// zero-fill the rest of the block. `buf` must already be sized to
/// `block_size`; `content_len` is the number of real content bytes
/// already written into it.
pub fn pad_leaf(buf: &mut [u8], content_len: usize) {
    debug_assert!(content_len < buf.len());
    buf[content_len] = 0x80;
    for byte in &mut buf[content_len + 1..] {
        *byte = 0;
    }
}

/// Inverse of [`pad_leaf`]: scan from the end, skipping `0x00`, and
/// return the content length up to (not including) the `0x80`
/// sentinel.
///
/// # Errors
///
/// Returns [`CodecError::BadPaddingSentinel`] if the first non-zero
/// byte encountered scanning backwards is not `0x80`.
pub fn unpad_leaf(buf: &[u8]) -> Result<usize> {
    let mut i = buf.len();
    loop {
        if i == 0 {
            return Err(CodecError::BadPaddingSentinel);
        }
        i -= 1;
        match buf[i] {
            0x00 => continue,
            0x80 => return Ok(i),
            _ => return Err(CodecError::BadPaddingSentinel),
        }
    }
}

fn check_block_len(buf: &[u8]) -> Result<()> {
    if buf.len() == BlockSize::Small.bytes() || buf.len() == BlockSize::Large.bytes() {
        Ok(())
    } else {
        Err(CodecError::WrongBlockLen(buf.len()))
    }
}

/// Encrypt a padded leaf plaintext block under `secret`, returning the
/// resulting `(reference, key)` pair and the ciphertext to store.
///
/// Steps (spec §4.2):
/// 1. `k = BLAKE2b-256(key = secret, data = plaintext)`.
/// 2. `ciphertext = ChaCha20(key = k, nonce = 0, counter = 0, plaintext)`.
/// 3. `r = BLAKE2b-256(ciphertext)`.
pub fn leaf_encrypt(plaintext: &[u8], secret: Secret) -> Result<(Pair, Vec<u8>)> {
    check_block_len(plaintext)?;

    let k = blake2b_256(secret.as_ref(), plaintext);
    let mut ciphertext = plaintext.to_vec();
    chacha20_xor(&k, &level_nonce(0), 0, &mut ciphertext);
    let r = blake2b_256(&[], &ciphertext);

    Ok((Pair::new(Reference(r), Key(k)), ciphertext))
}

/// Decrypt and verify a leaf block fetched under `pair.reference`.
///
/// # Errors
///
/// Returns [`CodecError::ReferenceMismatch`] if `ciphertext` does not
/// hash to `pair.reference`.
pub fn leaf_decrypt(ciphertext: &[u8], pair: Pair) -> Result<Vec<u8>> {
    check_block_len(ciphertext)?;
    verify(ciphertext, pair.reference)?;

    let mut plaintext = ciphertext.to_vec();
    chacha20_xor(&pair.key.0, &level_nonce(0), 0, &mut plaintext);
    Ok(plaintext)
}

/// Encrypt a packed-pairs node block at `level` (spec §4.2). Identical
/// to leaf encryption except the BLAKE2b key is always the all-zero
/// Secret, and the ChaCha20 nonce's last byte carries `level`.
///
/// # Panics
///
/// Panics if `level == 0`; level 0 is reserved for leaves.
pub fn node_encrypt(packed: &[u8], level: u8) -> Result<(Pair, Vec<u8>)> {
    assert!(level > 0, "level 0 is reserved for leaves");
    check_block_len(packed)?;

    let k = blake2b_256(Secret::public().as_ref(), packed);
    let mut ciphertext = packed.to_vec();
    chacha20_xor(&k, &level_nonce(level), 0, &mut ciphertext);
    let r = blake2b_256(&[], &ciphertext);

    Ok((Pair::new(Reference(r), Key(k)), ciphertext))
}

/// Decrypt and verify a node block fetched at `level`.
pub fn node_decrypt(ciphertext: &[u8], pair: Pair, level: u8) -> Result<Vec<u8>> {
    assert!(level > 0, "level 0 is reserved for leaves");
    check_block_len(ciphertext)?;
    verify(ciphertext, pair.reference)?;

    let mut packed = ciphertext.to_vec();
    chacha20_xor(&pair.key.0, &level_nonce(level), 0, &mut packed);
    Ok(packed)
}

/// Verify a fetched block's reference without decrypting it.
///
/// # Errors
///
/// Returns [`CodecError::ReferenceMismatch`] on hash mismatch.
pub fn verify(ciphertext: &[u8], expected: Reference) -> Result<()> {
    let actual = blake2b_256(&[], ciphertext);
    if actual == expected.0 {
        Ok(())
    } else {
        Err(CodecError::ReferenceMismatch)
    }
}

/// Pack up to `arity` pairs into a fresh `block_size` node buffer,
/// zero-padded. `pairs.len()` must be `<= arity`.
#[must_use]
pub fn pack_pairs(pairs: &[Pair], block_size: BlockSize) -> Vec<u8> {
    let mut buf = vec![0u8; block_size.bytes()];
    for (i, pair) in pairs.iter().enumerate() {
        let offset = i * PAIR_LEN;
        buf[offset..offset + PAIR_LEN].copy_from_slice(&pair.to_bytes());
    }
    buf
}

/// Unpack a decrypted node buffer into its present child pairs,
/// stopping at the first all-zero slot (spec §3: "once an all-zero
/// pair is encountered, no later pair in that block is child-present").
#[must_use]
pub fn unpack_pairs(buf: &[u8]) -> Vec<Pair> {
    let mut out = Vec::with_capacity(buf.len() / PAIR_LEN);
    for chunk in buf.chunks_exact(PAIR_LEN) {
        let pair = Pair::from_bytes(chunk);
        if !pair.is_present() {
            break;
        }
        out.push(pair);
    }
    out
}
