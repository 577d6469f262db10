//! The root capability: block size, tree level, root pair, and their
//! 66-byte binary layout.

#[cfg(feature = "cbor")]
pub mod cbor;
pub mod urn;

use crate::codec::{PAIR_LEN, Pair};

/// Byte layout of an [`ErisCap`]: `block_size_byte ‖ level ‖ reference[32] ‖ key[32]`.
pub const CAP_LEN: usize = 1 + 1 + PAIR_LEN;

/// A block is either 1 KiB or 32 KiB. Encoded as the base-2 logarithm
/// of the size (`0x0A` or `0x0F`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlockSize {
    /// 1024 bytes.
    Small,
    /// 32768 bytes.
    Large,
}

impl BlockSize {
    /// Size in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Small => 1024,
            Self::Large => 32768,
        }
    }

    /// Arity: number of 64-byte child pairs that fit in one node of
    /// this size.
    #[must_use]
    pub const fn arity(self) -> usize {
        self.bytes() / PAIR_LEN
    }

    /// The wire encoding: the base-2 logarithm of the byte size.
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Self::Small => 0x0A,
            Self::Large => 0x0F,
        }
    }

    /// Parse the wire encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidBlockSizeByte`] for any byte
    /// other than `0x0A` or `0x0F`.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x0A => Ok(Self::Small),
            0x0F => Ok(Self::Large),
            other => Err(CapabilityError::InvalidBlockSizeByte(other)),
        }
    }
}

/// Errors constructing or parsing an [`ErisCap`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CapabilityError {
    #[error("invalid block size byte 0x{0:02x}, expected 0x0a or 0x0f")]
    InvalidBlockSizeByte(u8),
    #[error("capability payload is {0} bytes, expected {CAP_LEN}")]
    WrongPayloadLen(usize),
    #[error("malformed urn: {0}")]
    MalformedUrn(String),
    #[cfg(feature = "cbor")]
    #[error("malformed cbor capability: {0}")]
    InvalidCbor(String),
}

pub type Result<T> = std::result::Result<T, CapabilityError>;

/// `(block_size, level, root_pair)`. `level == 0` means the root *is*
/// a leaf; `level >= 1` means the root is an interior node at that
/// depth (spec §3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ErisCap {
    pub block_size: BlockSize,
    pub level: u8,
    pub root: Pair,
}

impl ErisCap {
    #[must_use]
    pub fn new(block_size: BlockSize, level: u8, root: Pair) -> Self {
        Self {
            block_size,
            level,
            root,
        }
    }

    /// Pack into the 66-byte wire form.
    #[must_use]
    pub fn to_bytes(self) -> [u8; CAP_LEN] {
        let mut out = [0u8; CAP_LEN];
        out[0] = self.block_size.byte();
        out[1] = self.level;
        out[2..].copy_from_slice(&self.root.to_bytes());
        out
    }

    /// Parse from a 66-byte wire form.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::WrongPayloadLen`] if `bytes` is not
    /// exactly 66 bytes, or [`CapabilityError::InvalidBlockSizeByte`]
    /// if the first byte is not `0x0a`/`0x0f`. Any `level` byte value
    /// is syntactically accepted (spec §9 open question); semantic
    /// range checks happen during tree traversal, not here.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CAP_LEN {
            return Err(CapabilityError::WrongPayloadLen(bytes.len()));
        }
        let block_size = BlockSize::from_byte(bytes[0])?;
        let level = bytes[1];
        let root = Pair::from_bytes(&bytes[2..]);
        Ok(Self {
            block_size,
            level,
            root,
        })
    }
}
