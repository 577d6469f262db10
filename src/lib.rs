//! ERIS: Encoding for Robust Immutable Storage.
//!
//! Content-addressable encoding that transforms an arbitrary byte
//! stream into a fixed-arity Merkle tree of encrypted, fixed-size
//! blocks, addressed by a compact root [`capability::ErisCap`]. Any
//! party holding the capability can reconstruct the original byte
//! stream from a [`store::Store`]; without it, blocks are opaque
//! ciphertext. The encoding is convergent (identical content with an
//! identical [`codec::Secret`] yields identical blocks) and verifiable
//! (each block's address is the BLAKE2b-256 hash of its ciphertext).
//!
//! Three entry points cover most use: [`convenience::encode`] and
//! [`convenience::decode`] for whole-stream operations, or
//! [`ingest::Ingest`] and [`reader::StreamReader`] for streaming/
//! random-access control.

pub mod capability;
pub mod codec;
pub mod convenience;
pub mod error;
pub mod ingest;
pub mod primitives;
pub mod reader;
pub mod store;
pub mod tree;

pub use capability::{BlockSize, CapabilityError, ErisCap};
pub use codec::{CodecError, Key, Pair, Reference, Secret};
pub use convenience::{decode, encode};
pub use error::{Error, Result};
pub use ingest::{Ingest, IngestError};
pub use reader::{ReaderError, StreamReader};
pub use store::{MemoryStore, Store, StoreError};
