//! Concurrent matching passes over a shared engine and cache.

use std::sync::Arc;

use reclaim_match::{EngineConfig, MatchEngine, Post, ReportType};

fn post(id: i64, report_type: ReportType, item: &str, desc: &str) -> Post {
    Post {
        id,
        user_id: id,
        report_type,
        item_name: item.into(),
        description: desc.into(),
    }
}

fn shared_pool() -> Vec<Post> {
    (100..120)
        .map(|i| {
            post(
                i,
                ReportType::Found,
                "black leather wallet",
                &format!("found near building {i}"),
            )
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_passes_converge_on_cached_embeddings() {
    let engine = Arc::new(MatchEngine::new(EngineConfig::default()).unwrap());
    let pool = Arc::new(shared_pool());

    // Two different new posts race over the same candidate pool.
    let post_a = post(1, ReportType::Lost, "black leather wallet", "lost monday");
    let post_b = post(2, ReportType::Lost, "black leather wallet", "lost tuesday");

    let (engine_a, pool_a) = (engine.clone(), pool.clone());
    let a = tokio::spawn(async move {
        engine_a
            .find_matches_with_threshold(&post_a, &pool_a, -1.0)
            .await
    });
    let (engine_b, pool_b) = (engine.clone(), pool.clone());
    let b = tokio::spawn(async move {
        engine_b
            .find_matches_with_threshold(&post_b, &pool_b, -1.0)
            .await
    });

    let (matches_a, matches_b) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(matches_a.len(), pool.len());
    assert_eq!(matches_b.len(), pool.len());

    // Whatever the interleaving, every candidate ends with exactly one
    // cached vector and both passes saw the same one.
    for candidate in pool.iter() {
        let cached = engine.cache().get(candidate.id).expect("candidate cached");
        let score_a = matches_a
            .iter()
            .find(|m| m.post.id == candidate.id)
            .unwrap()
            .score;
        let score_b = matches_b
            .iter()
            .find(|m| m.post.id == candidate.id)
            .unwrap()
            .score;
        assert_eq!(score_a, score_b, "post {} diverged", candidate.id);
        assert!(!cached.vector.is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_concurrent_passes_do_not_corrupt_cache() {
    let engine = Arc::new(MatchEngine::new(EngineConfig::default()).unwrap());
    let pool = Arc::new(shared_pool());

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = engine.clone();
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let query = post(
                1000 + i,
                ReportType::Lost,
                "black leather wallet",
                "lost somewhere",
            );
            engine.find_matches_with_threshold(&query, &pool, -1.0).await
        }));
    }

    for handle in handles {
        let matches = handle.await.unwrap();
        assert_eq!(matches.len(), pool.len());
    }

    // 20 candidates + 16 query posts.
    assert_eq!(engine.cache().len(), pool.len() + 16);
}
