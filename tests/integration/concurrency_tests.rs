//! Concurrency tests for the resolve path.
//!
//! Concurrent misses for the same variant are not coalesced: each request
//! generates and uploads the variant, and the last write wins. Both uploads
//! carry equivalent bytes, so clients see the same result either way.

use std::sync::Arc;

use axum::http::StatusCode;

use image_gateway::storage::InMemoryStore;

use super::test_utils::{
    build_router, get, image_dimensions, seeded_store, stored, GatedStore, RESIZED_FOLDER,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_misses_both_generate() {
    let inner = Arc::new(seeded_store());
    let gated = Arc::new(GatedStore::new(Arc::clone(&inner), RESIZED_FOLDER, 2));
    let router = build_router(Arc::clone(&gated));

    // Both requests pass the resized-variant check before either uploads
    let (first, second) = tokio::join!(
        get(&router, "/cat.jpeg?w=400"),
        get(&router, "/cat.jpeg?w=400")
    );

    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        first.headers().get("location"),
        second.headers().get("location")
    );
    assert_eq!(first.headers().get("x-image-cache").unwrap(), "miss");
    assert_eq!(second.headers().get("x-image-cache").unwrap(), "miss");

    let stats = gated.inner().stats();
    assert_eq!(stats.downloads, 2);
    assert_eq!(stats.uploads, 2);

    let variant = stored(&inner, "resized/cat/w400h0.jpeg").await;
    assert_eq!(image_dimensions(&variant.data), (400, 200));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_requests() {
    let store: Arc<InMemoryStore> = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let mut handles = Vec::new();
    for width in [50u32, 60, 70, 80] {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let uri = format!("/logo.png?w={}", width);
            let response = get(&router, &uri).await;
            (width, response.status())
        }));
    }

    for handle in handles {
        let (width, status) = handle.await.unwrap();
        assert_eq!(status, StatusCode::SEE_OTHER, "width {}", width);
    }

    assert_eq!(store.stats().uploads, 4);
    for width in [50u32, 60, 70, 80] {
        let key = format!("resized/logo/w{}h0.png", width);
        let variant = stored(&store, &key).await;
        assert_eq!(image_dimensions(&variant.data).0, width);
    }
}
