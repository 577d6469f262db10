//! Universal properties from spec §8: round-trip, convergence,
//! reference determinism, the level bound, and URN round-trip.

use std::sync::Arc;

use eris::capability::urn;
use eris::{BlockSize, MemoryStore, Secret, Store, decode, encode};

mod common;

fn content_of_len(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

async fn roundtrip_case(content: &[u8], block_size: BlockSize, secret: Secret) {
    common::init_tracing();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let cap = encode(store.clone(), content, block_size, secret)
        .await
        .unwrap();
    let decoded = decode(store, cap).await.unwrap();
    assert_eq!(decoded, content, "round trip failed for {} bytes", content.len());
}

#[tokio::test]
async fn roundtrip_across_sizes_and_block_sizes() {
    let lengths = [0, 1, 12, 1023, 1024, 1025, 4096, 40_000];
    for &len in &lengths {
        let content = content_of_len(len);
        roundtrip_case(&content, BlockSize::Small, Secret::public()).await;
    }
    // A couple of spot checks against the large block size too, kept
    // small enough for a fast test run.
    for &len in &[0, 32768, 32769, 70_000] {
        let content = content_of_len(len);
        roundtrip_case(&content, BlockSize::Large, Secret::public()).await;
    }
}

#[tokio::test]
async fn roundtrip_under_non_public_secrets() {
    let secrets = [Secret::public(), Secret([1u8; 32]), Secret([0xFFu8; 32])];
    for secret in secrets {
        roundtrip_case(b"some content under a secret", BlockSize::Small, secret).await;
    }
}

#[tokio::test]
async fn encode_depends_only_on_content_block_size_and_secret() {
    common::init_tracing();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let content = content_of_len(5000);

    let cap_a = encode(store.clone(), &content, BlockSize::Small, Secret::public())
        .await
        .unwrap();
    let cap_b = encode(store.clone(), &content, BlockSize::Small, Secret::public())
        .await
        .unwrap();
    assert_eq!(cap_a, cap_b, "same (content, block size, secret) must converge");

    let cap_c = encode(store.clone(), &content, BlockSize::Small, Secret([1u8; 32]))
        .await
        .unwrap();
    assert_ne!(cap_a, cap_c, "a different secret must not converge");

    let different_content = content_of_len(5001);
    let cap_d = encode(
        store,
        &different_content,
        BlockSize::Small,
        Secret::public(),
    )
    .await
    .unwrap();
    assert_ne!(cap_a, cap_d, "different content must not converge");
}

#[tokio::test]
async fn single_leaf_content_is_level_zero() {
    common::init_tracing();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let cap = encode(store, b"fits in one block", BlockSize::Small, Secret::public())
        .await
        .unwrap();
    assert_eq!(cap.level, 0);
}

#[tokio::test]
async fn level_grows_with_leaf_count() {
    common::init_tracing();
    let arity = BlockSize::Small.arity();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

    // Exactly one full block of real content plus one padding leaf
    // (content length is a multiple of block_size) => 2 leaves => a
    // single level-1 node.
    let content = content_of_len(1024);
    let cap = encode(store.clone(), &content, BlockSize::Small, Secret::public())
        .await
        .unwrap();
    assert_eq!(cap.level, 1);

    // `arity` full blocks plus one padding leaf => arity + 1 leaves,
    // which needs two level-1 nodes, hence a level-2 root.
    let content = content_of_len(1024 * arity);
    let cap = encode(store, &content, BlockSize::Small, Secret::public())
        .await
        .unwrap();
    assert_eq!(cap.level, 2);
}

#[tokio::test]
async fn urn_roundtrip_for_every_level_shape() {
    common::init_tracing();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    for len in [0usize, 1024, 1024 * 20] {
        let content = content_of_len(len);
        let cap = encode(store.clone(), &content, BlockSize::Small, Secret::public())
            .await
            .unwrap();

        let formatted = urn::to_urn(cap);
        let parsed = urn::from_urn(&formatted).unwrap();
        assert_eq!(parsed, cap);
        assert_eq!(urn::to_urn(parsed), formatted);
    }
}
