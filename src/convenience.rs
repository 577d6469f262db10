//! Single-shot encode/decode convenience wrappers over [`Ingest`] and
//! [`StreamReader`], for callers that don't need streaming control.

use std::sync::Arc;

use crate::capability::{BlockSize, ErisCap};
use crate::codec::Secret;
use crate::error::Result;
use crate::ingest::Ingest;
use crate::reader::StreamReader;
use crate::store::Store;

/// Encode `content` in one call: append it all, then take the cap.
pub async fn encode(
    store: Arc<dyn Store>,
    content: &[u8],
    block_size: BlockSize,
    secret: Secret,
) -> Result<ErisCap> {
    let mut ingest = Ingest::new(store, block_size, secret);
    ingest.append(content).await?;
    Ok(ingest.cap().await?)
}

/// Decode a capability back into its full byte stream in one call.
pub async fn decode(store: Arc<dyn Store>, cap: ErisCap) -> Result<Vec<u8>> {
    let mut reader = StreamReader::new(store, cap);
    let len = reader.length().await? as usize;

    let mut out = vec![0u8; len];
    let mut written = 0;
    while written < out.len() {
        let n = reader.read(&mut out[written..]).await?;
        if n == 0 {
            break;
        }
        written += n;
    }
    out.truncate(written);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::store::MemoryStore;

    #[tokio::test]
    async fn roundtrip_empty_content() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let cap = encode(store.clone(), b"", BlockSize::Small, Secret::public())
            .await
            .unwrap();
        let decoded = decode(store, cap).await.unwrap();
        assert_eq!(decoded, b"");
    }

    #[tokio::test]
    async fn roundtrip_short_content() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let content = b"Hello world!";
        let cap = encode(store.clone(), content, BlockSize::Small, Secret::public())
            .await
            .unwrap();
        let decoded = decode(store, cap).await.unwrap();
        assert_eq!(decoded, content);
    }

    #[tokio::test]
    async fn roundtrip_multi_block_content() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let content: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let cap = encode(store.clone(), &content, BlockSize::Small, Secret::public())
            .await
            .unwrap();
        let decoded = decode(store, cap).await.unwrap();
        assert_eq!(decoded, content);
    }

    #[tokio::test]
    async fn roundtrip_with_non_public_secret() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let secret = Secret([42u8; 32]);
        let content = b"convergent under a secret salt";
        let cap = encode(store.clone(), content, BlockSize::Small, secret)
            .await
            .unwrap();
        let decoded = decode(store, cap).await.unwrap();
        assert_eq!(decoded, content);
    }

    #[tokio::test]
    async fn encode_is_convergent_on_content_and_secret() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let content = b"convergence check";

        let cap_a = encode(store.clone(), content, BlockSize::Small, Secret::public())
            .await
            .unwrap();
        let cap_b = encode(store.clone(), content, BlockSize::Small, Secret::public())
            .await
            .unwrap();

        assert_eq!(cap_a, cap_b);
    }

    #[tokio::test]
    async fn large_block_size_roundtrips() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let content: Vec<u8> = (0..100_000u32).map(|i| (i % 256) as u8).collect();
        let cap = encode(store.clone(), &content, BlockSize::Large, Secret::public())
            .await
            .unwrap();
        let decoded = decode(store, cap).await.unwrap();
        assert_eq!(decoded, content);
    }
}
