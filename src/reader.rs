//! Random-access stream reader over an existing capability (spec
//! §4.6): lazily expands the tree into a flat leaf list on first read,
//! then serves `read`/`seek`/`tell`/`length`/`read_line` against it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::capability::{BlockSize, ErisCap};
use crate::codec::{CodecError, Pair, leaf_decrypt, node_decrypt, unpack_pairs, unpad_leaf};
use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Recursively expand a node's present children into the flat leaf
/// list. Boxed because `async fn` cannot recurse directly (the
/// resulting future would have unbounded size); tree depth is bounded
/// (`level <= 255`, realistically `<= 6`), so this never grows deep
/// enough to matter (spec §9).
fn expand_node<'a>(
    store: &'a dyn Store,
    pair: Pair,
    level: u8,
    leaves_out: &'a mut Vec<Pair>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), ReaderError>> + 'a>> {
    Box::pin(async move {
        debug!(reference = ?pair.reference, level, "fetching node block");
        let ciphertext = store.get(pair.reference).await?;
        let packed = node_decrypt(&ciphertext, pair, level).map_err(|e| {
            warn!(level, error = %e, "node block failed verification");
            e
        })?;
        let children = unpack_pairs(&packed);

        if level == 1 {
            leaves_out.extend(children);
        } else {
            for child in children {
                expand_node(store, child, level - 1, leaves_out).await?;
            }
        }
        Ok(())
    })
}

async fn expand_leaves(store: &dyn Store, cap: ErisCap) -> Result<Vec<Pair>, ReaderError> {
    if cap.level == 0 {
        return Ok(vec![cap.root]);
    }
    let mut leaves = Vec::new();
    expand_node(store, cap.root, cap.level, &mut leaves).await?;
    Ok(leaves)
}

/// A cursor over the decoded byte stream addressed by an [`ErisCap`].
pub struct StreamReader {
    store: Arc<dyn Store>,
    cap: ErisCap,
    pos: u64,
    leaves: Option<Vec<Pair>>,
    stopped: bool,
}

impl StreamReader {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, cap: ErisCap) -> Self {
        Self {
            store,
            cap,
            pos: 0,
            leaves: None,
            stopped: false,
        }
    }

    /// The capability this reader serves.
    #[must_use]
    pub fn cap(&self) -> ErisCap {
        self.cap
    }

    async fn leaves(&mut self) -> Result<&[Pair], ReaderError> {
        if self.leaves.is_none() {
            let leaves = expand_leaves(self.store.as_ref(), self.cap).await?;
            self.leaves = Some(leaves);
        }
        Ok(self.leaves.as_deref().unwrap())
    }

    async fn fetch_leaf_plaintext(&mut self, index: usize) -> Result<Vec<u8>, ReaderError> {
        let pair = self.leaves().await?[index];
        debug!(reference = ?pair.reference, index, "fetching leaf block");
        let ciphertext = self.store.get(pair.reference).await?;
        let plaintext = leaf_decrypt(&ciphertext, pair).map_err(|e| {
            warn!(index, error = %e, "leaf block failed verification");
            e
        })?;
        Ok(plaintext)
    }

    /// Total content length in bytes:
    /// `(n_leaves - 1) * block_size + len(unpad(last_leaf))`.
    pub async fn length(&mut self) -> Result<u64, ReaderError> {
        let block_len = self.cap.block_size.bytes() as u64;
        let n_leaves = self.leaves().await?.len();
        let last_index = n_leaves - 1;

        let last_plain = self.fetch_leaf_plaintext(last_index).await?;
        let last_len = unpad_leaf(&last_plain)
            .map_err(|e| {
                warn!(error = %e, "last leaf padding is corrupt");
                e
            })? as u64;

        Ok((n_leaves as u64 - 1) * block_len + last_len)
    }

    /// Move the cursor to an absolute byte offset. Clears any
    /// previously observed end-of-stream condition.
    pub fn seek(&mut self, pos: u64) {
        self.pos = pos;
        self.stopped = false;
    }

    /// Current absolute byte offset.
    #[must_use]
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Fill as much of `buf` as possible from the current position,
    /// advancing it. Returns the number of bytes written; `0` means
    /// end of stream.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReaderError> {
        let mut written = 0;
        if self.stopped {
            return Ok(0);
        }
        let block_len = self.cap.block_size.bytes() as u64;

        while written < buf.len() {
            let blk_index = (self.pos / block_len) as usize;
            let blk_off = (self.pos % block_len) as usize;

            let n_leaves = self.leaves().await?.len();
            if blk_index >= n_leaves {
                self.stopped = true;
                break;
            }
            let last_leaf_index = n_leaves - 1;

            let mut plaintext = self.fetch_leaf_plaintext(blk_index).await?;
            let content_len = if blk_index == last_leaf_index {
                unpad_leaf(&plaintext).map_err(|e| {
                    warn!(error = %e, blk_index, "last leaf padding is corrupt");
                    e
                })?
            } else {
                plaintext.len()
            };
            plaintext.truncate(content_len);

            if blk_index == last_leaf_index && content_len <= blk_off {
                self.stopped = true;
                break;
            }

            let available = content_len - blk_off;
            let want = (buf.len() - written).min(available);
            buf[written..written + want].copy_from_slice(&plaintext[blk_off..blk_off + want]);
            written += want;
            self.pos += want as u64;
        }

        Ok(written)
    }

    /// Like [`StreamReader::read`], but stops at `\n` or `\r`; the
    /// terminator is consumed but not included in the returned bytes.
    /// An empty return with the stream not yet at EOF indicates a
    /// blank line.
    pub async fn read_line(&mut self) -> Result<Vec<u8>, ReaderError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.read(&mut byte).await?;
            if n == 0 || byte[0] == b'\n' || byte[0] == b'\r' {
                break;
            }
            line.push(byte[0]);
        }
        Ok(line)
    }
}
