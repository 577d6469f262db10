//! The streaming ingest state machine (spec §4.4): `append` buffers
//! content and flushes full leaves as it goes; `cap` can be queried at
//! any time without disturbing subsequent appends.

use std::sync::Arc;

use tracing::debug;

use crate::capability::{BlockSize, ErisCap};
use crate::codec::{CodecError, Pair, Secret, leaf_encrypt, pad_leaf};
use crate::store::{Store, StoreError};
use crate::tree::{self, TreeError};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// A streaming encoder: feed it bytes with [`Ingest::append`], query
/// [`Ingest::cap`] as often as you like.
///
/// Holds a `block_size`-length working buffer, a write position, and
/// the leaf list accumulated so far. Operations on one `Ingest` must
/// be serialised by the caller (spec §5); it is not `Sync`-safe to
/// call `append` and `cap` concurrently on the same instance.
pub struct Ingest {
    store: Arc<dyn Store>,
    block_size: BlockSize,
    secret: Secret,
    /// Working buffer, always exactly `block_size` bytes. Bytes past
    /// the current partial-write offset are meaningless until
    /// overwritten by a later `append`.
    buf: Vec<u8>,
    /// Total bytes appended since construction.
    pos: u64,
    /// Leaf pairs flushed so far, in insertion order.
    leaves: Vec<Pair>,
}

impl Ingest {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, block_size: BlockSize, secret: Secret) -> Self {
        Self {
            store,
            block_size,
            secret,
            buf: vec![0u8; block_size.bytes()],
            pos: 0,
            leaves: Vec::new(),
        }
    }

    /// Total bytes appended since construction.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Append bytes to the stream, flushing any leaf blocks that
    /// become full along the way. Suspends until each triggered store
    /// `put` completes.
    pub async fn append(&mut self, mut bytes: &[u8]) -> Result<(), IngestError> {
        let block_len = self.block_size.bytes();

        while !bytes.is_empty() {
            let offset = (self.pos % block_len as u64) as usize;
            let room = block_len - offset;
            let take = room.min(bytes.len());

            self.buf[offset..offset + take].copy_from_slice(&bytes[..take]);
            self.pos += take as u64;
            bytes = &bytes[take..];

            if offset + take == block_len {
                self.flush_full_buffer().await?;
            }
        }
        Ok(())
    }

    async fn flush_full_buffer(&mut self) -> Result<(), IngestError> {
        let (pair, ciphertext) = leaf_encrypt(&self.buf, self.secret)?;
        debug!(leaf_index = self.leaves.len(), "flushing full leaf");
        self.store.put(pair.reference, ciphertext).await?;
        self.leaves.push(pair);
        Ok(())
    }

    /// Return the root capability for everything appended so far,
    /// without disturbing subsequent `append` calls.
    ///
    /// Pads a *copy* of the working buffer (spec §4.4 steps 1–3),
    /// encrypts it as a leaf, and — if there are prior leaves — builds
    /// interior levels bottom-up over `leaves ++ [padding_pair]` (spec
    /// §4.5), without mutating `self.leaves` permanently.
    ///
    /// Note: because [`leaf_encrypt`] takes plaintext by reference and
    /// returns a freshly allocated ciphertext, the working buffer
    /// itself is never turned into ciphertext in place — so unlike the
    /// reference algorithm's XOR-back trick, there is nothing to
    /// restore here. See `DESIGN.md` for the full rationale.
    pub async fn cap(&self) -> Result<ErisCap, IngestError> {
        let block_len = self.block_size.bytes();
        let p = (self.pos % block_len as u64) as usize;

        let mut padded = self.buf.clone();
        pad_leaf(&mut padded, p);
        let (padding_pair, ciphertext) = leaf_encrypt(&padded, self.secret)?;
        self.store.put(padding_pair.reference, ciphertext).await?;

        if self.leaves.is_empty() {
            return Ok(ErisCap::new(self.block_size, 0, padding_pair));
        }

        let mut leaves_with_padding = self.leaves.clone();
        leaves_with_padding.push(padding_pair);
        let cap = tree::build_root(self.store.as_ref(), leaves_with_padding, self.block_size)
            .await?;
        Ok(cap)
    }
}
