//! The abstract async block store the core consumes, plus a small
//! in-memory reference implementation for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::codec::Reference;

/// Errors the store surfaces. The store performs no verification or
/// decryption; it only maps references to opaque ciphertext.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("no block stored under this reference")]
    NotFound,
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// An async key→blob map keyed by 32-byte references. Per-reference
/// `put` is idempotent: the same reference always carries the same
/// ciphertext, so concurrent puts from multiple ingests racing on the
/// same reference are safe (last-writer-wins, harmlessly).
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the ciphertext stored under `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no block is stored under
    /// `reference`.
    async fn get(&self, reference: Reference) -> Result<Vec<u8>>;

    /// Store `block` under `reference`. Idempotent for a repeated
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on a backend failure.
    async fn put(&self, reference: Reference, block: Vec<u8>) -> Result<()>;

    /// Release backend resources. The default implementation is a
    /// no-op; backends holding file handles or connections override
    /// it.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory [`Store`] backed by a `HashMap` behind an async
/// `RwLock`, safe for concurrent use by multiple ingests and readers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blocks: Arc<RwLock<HashMap<[u8; 32], Vec<u8>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blocks currently held.
    pub async fn len(&self) -> usize {
        self.blocks.read().await.len()
    }

    /// Whether the store holds no blocks.
    pub async fn is_empty(&self) -> bool {
        self.blocks.read().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, reference: Reference) -> Result<Vec<u8>> {
        let block = self.blocks.read().await.get(&reference.0).cloned();
        match block {
            Some(block) => {
                debug!(bytes = block.len(), "loaded block");
                Ok(block)
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn put(&self, reference: Reference, block: Vec<u8>) -> Result<()> {
        debug!(bytes = block.len(), "storing block");
        self.blocks.write().await.insert(reference.0, block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = MemoryStore::new();
        let reference = Reference([1u8; 32]);
        store.put(reference, vec![1, 2, 3]).await.unwrap();

        assert_eq!(store.get(reference).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_reference_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get(Reference([9u8; 32])).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn put_is_idempotent_for_same_reference() {
        let store = MemoryStore::new();
        let reference = Reference([2u8; 32]);
        store.put(reference, vec![1, 2, 3]).await.unwrap();
        store.put(reference, vec![1, 2, 3]).await.unwrap();

        assert_eq!(store.len().await, 1);
    }
}
