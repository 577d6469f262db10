//! Interior tree construction (spec §4.5): reducing an ordered list of
//! level-`L-1` pairs into level-`L` node blocks, repeated bottom-up
//! until one pair remains.
//!
//! Shared by the ingest engine's `cap()` (the only place that builds
//! interior nodes — the reader only ever walks them back down).

use crate::capability::{BlockSize, ErisCap};
use crate::codec::{CodecError, Pair, node_encrypt, pack_pairs};
use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reduce one level: pack each contiguous run of up to `arity` pairs
/// into a node block, encrypt and store it, and collect the resulting
/// pairs. The output has `⌈pairs.len() / arity⌉` pairs, preserving
/// left-to-right order. The last node block may be short; its
/// trailing slots stay zero.
pub async fn reduce_level(
    store: &dyn Store,
    pairs: &[Pair],
    block_size: BlockSize,
    level: u8,
) -> Result<Vec<Pair>, TreeError> {
    let arity = block_size.arity();
    let mut out = Vec::with_capacity(pairs.len().div_ceil(arity));
    for chunk in pairs.chunks(arity) {
        let packed = pack_pairs(chunk, block_size);
        let (pair, ciphertext) = node_encrypt(&packed, level)?;
        store.put(pair.reference, ciphertext).await?;
        out.push(pair);
    }
    Ok(out)
}

/// Build the root capability from an ordered, non-empty list of leaf
/// pairs. A single leaf produces a level-0 cap with no interior nodes;
/// otherwise interior levels are built strictly bottom-up until
/// exactly one pair remains.
///
/// # Panics
///
/// Panics if `leaves` is empty; the ingest engine guarantees at least
/// one leaf (even empty content produces one padding leaf).
pub async fn build_root(
    store: &dyn Store,
    leaves: Vec<Pair>,
    block_size: BlockSize,
) -> Result<ErisCap, TreeError> {
    assert!(!leaves.is_empty(), "a tree always has at least one leaf");

    if leaves.len() == 1 {
        return Ok(ErisCap::new(block_size, 0, leaves[0]));
    }

    let mut level_pairs = leaves;
    let mut level = 1u8;
    loop {
        level_pairs = reduce_level(store, &level_pairs, block_size, level).await?;
        if level_pairs.len() == 1 {
            return Ok(ErisCap::new(block_size, level, level_pairs[0]));
        }
        level += 1;
    }
}
