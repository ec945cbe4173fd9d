//! API integration tests for image redirects and error handling.
//!
//! Tests verify:
//! - Redirects to originals and to resized variants
//! - Cache miss followed by cache hit
//! - Error cases (bad path, missing image, bad size, corrupt original)
//! - Storage round trips performed per request

use std::sync::Arc;

use axum::http::StatusCode;
use http_body_util::BodyExt;

use image_gateway::server::IMAGE_CACHE_HEADER;
use image_gateway::storage::{InMemoryStore, StoreStats};

use super::test_utils::{
    build_router, get, image_dimensions, is_valid_jpeg, is_valid_png, seeded_store, stored,
    TEST_BASE_URL,
};

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

fn cache_outcome(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get(IMAGE_CACHE_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn body_text(response: axum::http::Response<axum::body::Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

// =============================================================================
// Originals
// =============================================================================

#[tokio::test]
async fn test_original_redirect() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/original/cat.jpeg", TEST_BASE_URL)
    );
    assert_eq!(cache_outcome(&response), "original");

    // Only the existence check touches storage
    assert_eq!(
        store.stats(),
        StoreStats {
            checks: 1,
            downloads: 0,
            uploads: 0
        }
    );
}

#[tokio::test]
async fn test_unrelated_query_params_are_ignored() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?quality=10").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(cache_outcome(&response), "original");
}

// =============================================================================
// Resized Variants
// =============================================================================

#[tokio::test]
async fn test_resize_miss_then_hit() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?w=600").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/resized/cat/w600h0.jpeg", TEST_BASE_URL)
    );
    assert_eq!(cache_outcome(&response), "miss");
    assert_eq!(store.stats().downloads, 1);
    assert_eq!(store.stats().uploads, 1);

    let variant = stored(&store, "resized/cat/w600h0.jpeg").await;
    assert!(is_valid_jpeg(&variant.data));
    assert_eq!(image_dimensions(&variant.data), (600, 300));
    assert_eq!(variant.content_type, "image/jpeg");

    // Same request again: served from the stored variant
    let response = get(&router, "/cat.jpeg?w=600").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/resized/cat/w600h0.jpeg", TEST_BASE_URL)
    );
    assert_eq!(cache_outcome(&response), "hit");
    assert_eq!(store.stats().downloads, 1);
    assert_eq!(store.stats().uploads, 1);
}

#[tokio::test]
async fn test_resize_height_only() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?h=100").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).ends_with("/resized/cat/w0h100.jpeg"));

    let variant = stored(&store, "resized/cat/w0h100.jpeg").await;
    assert_eq!(image_dimensions(&variant.data), (200, 100));
}

#[tokio::test]
async fn test_resize_png_both_dimensions() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/logo.png?w=50&h=80").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/resized/logo/w50h80.png", TEST_BASE_URL)
    );

    let variant = stored(&store, "resized/logo/w50h80.png").await;
    assert!(is_valid_png(&variant.data));
    assert_eq!(image_dimensions(&variant.data), (50, 80));
    assert_eq!(variant.content_type, "image/png");
}

#[tokio::test]
async fn test_jpg_spelling_is_kept() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/photo.jpg?w=30").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).ends_with("/resized/photo/w30h0.jpg"));

    let variant = stored(&store, "resized/photo/w30h0.jpg").await;
    assert!(is_valid_jpeg(&variant.data));
    assert_eq!(image_dimensions(&variant.data), (30, 30));
}

#[tokio::test]
async fn test_distinct_sizes_get_distinct_keys() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let first = get(&router, "/cat.jpeg?w=100").await;
    let second = get(&router, "/cat.jpeg?w=200").await;

    assert_ne!(location(&first), location(&second));
    assert_eq!(store.stats().uploads, 2);
    // 3 originals + 2 variants
    assert_eq!(store.len().await, 5);
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_unsupported_extension() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/dog.gif").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "invalid image path");

    // Rejected before any storage call
    assert_eq!(store.stats(), StoreStats::default());
}

#[tokio::test]
async fn test_extension_is_case_sensitive() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.JPEG").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.stats(), StoreStats::default());
}

#[tokio::test]
async fn test_missing_image() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not Found");
}

#[tokio::test]
async fn test_missing_image_wins_over_bad_size() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/missing.png?w=abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_dimensions_are_rejected() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?w=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "if specified, w must be larger than 0"
    );

    let response = get(&router, "/cat.jpeg?h=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "if specified, h must be larger than 0"
    );

    assert_eq!(store.stats().downloads, 0);
    assert_eq!(store.stats().uploads, 0);
}

#[tokio::test]
async fn test_non_integer_dimension() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?w=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "failed converting w into integer"
    );

    let response = get(&router, "/cat.jpeg?w=10&h=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "failed converting h into integer"
    );
}

#[tokio::test]
async fn test_repeated_size_on_missing_image() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/missing.png?w=1&w=2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not Found");
    assert_eq!(store.stats().checks, 1);
}

#[tokio::test]
async fn test_repeated_size_uses_first_value() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?w=10&w=20").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).ends_with("/resized/cat/w10h0.jpeg"));

    let variant = stored(&store, "resized/cat/w10h0.jpeg").await;
    assert_eq!(image_dimensions(&variant.data), (10, 5));
}

#[tokio::test]
async fn test_repeated_size_first_value_is_validated() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?h=abc&h=10").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "failed converting h into integer"
    );
}

#[tokio::test]
async fn test_oversized_target_fails_without_upload() {
    let store = Arc::new(seeded_store());
    let router = build_router(Arc::clone(&store));

    let response = get(&router, "/cat.jpeg?w=4294967295").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");
    assert_eq!(store.stats().uploads, 0);

    // The gateway keeps serving afterwards
    let response = get(&router, "/cat.jpeg?w=40").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_corrupt_original() {
    let store = Arc::new(
        InMemoryStore::new(TEST_BASE_URL).with_object(
            "original/broken.png",
            b"definitely not a png".to_vec(),
            "image/png",
        ),
    );
    let router = build_router(Arc::clone(&store));

    // Serving the original needs no decoding
    let response = get(&router, "/broken.png").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get(&router, "/broken.png?w=10").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");
    assert_eq!(store.stats().uploads, 0);
}

// =============================================================================
// Health Check
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = build_router(Arc::new(seeded_store()));

    let response = get(&router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}
