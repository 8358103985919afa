//! Reproducibility guarantees: same inputs, same vectors, same ranking.

use reclaim_match::{
    Embedder, EmbeddingCache, EngineConfig, HashEmbedder, MatchEngine, Post, ReportType,
};

fn post(id: i64, report_type: ReportType, item: &str, desc: &str) -> Post {
    Post {
        id,
        user_id: id,
        report_type,
        item_name: item.into(),
        description: desc.into(),
    }
}

#[tokio::test]
async fn embed_twice_is_bit_identical() {
    let embedder = HashEmbedder::default();
    for text in ["black wallet", "", "Hello 世界", "a b c d e f g"] {
        let a = embedder.embed(text).await.unwrap();
        let b = embedder.embed(text).await.unwrap();
        assert_eq!(a.vector, b.vector, "text {text:?} must embed identically");
    }
}

#[tokio::test]
async fn embeddings_stable_across_instances() {
    // Two embedder instances with the same settings agree, so a process
    // restart reproduces the same vectors.
    let a = HashEmbedder::default();
    let b = HashEmbedder::default();
    let ea = a.embed("silver laptop with stickers").await.unwrap();
    let eb = b.embed("silver laptop with stickers").await.unwrap();
    assert_eq!(ea.vector, eb.vector);
}

#[tokio::test]
async fn ranking_is_reproducible() {
    let query = post(1, ReportType::Lost, "black leather wallet", "lost near library");
    let pool: Vec<Post> = (2..12)
        .map(|i| {
            post(
                i,
                ReportType::Found,
                "black leather wallet",
                &format!("found at location {i}"),
            )
        })
        .collect();

    let run = || async {
        let engine = MatchEngine::new(EngineConfig::default()).unwrap();
        engine
            .find_matches_with_threshold(&query, &pool, -1.0)
            .await
            .iter()
            .map(|m| (m.post.id, m.score))
            .collect::<Vec<_>>()
    };

    let first = run().await;
    let second = run().await;
    assert_eq!(first, second, "fresh engines must produce identical rankings");
    assert!(!first.is_empty());
}

#[tokio::test]
async fn cached_and_fresh_vectors_agree() {
    let embedder = HashEmbedder::default();
    let cache = EmbeddingCache::new();

    let cached = cache
        .get_or_compute(42, "blue umbrella compact", &embedder)
        .await
        .unwrap();
    let fresh = embedder.embed("blue umbrella compact").await.unwrap();
    assert_eq!(cached.vector, fresh.vector);

    // Second read comes from the cache and still agrees.
    let reread = cache
        .get_or_compute(42, "blue umbrella compact", &embedder)
        .await
        .unwrap();
    assert_eq!(reread.vector, fresh.vector);
}
