//! JSON API tests driven through the full router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};
use vibe_integration_tests::TestApp;
use vibe_storefront::catalog::TRENDING_TAGS;

fn ids(products: &Value) -> Vec<u64> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_after_shutdown() {
    let app = TestApp::new();
    app.session.shutdown();
    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_product_listing_defaults_to_newest() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 10);
    assert_eq!(ids(&body["products"]), vec![7, 2, 1, 10, 9, 8, 6, 5, 4, 3]);
    assert_eq!(body["query"]["category"], "All");
    assert_eq!(body["query"]["sort"], "newest");
}

#[tokio::test]
async fn test_product_listing_filters_and_sorts() {
    let app = TestApp::new();
    let (_, body) = app
        .get("/api/products?category=T-Shirts&sort=price-asc")
        .await;
    assert_eq!(ids(&body["products"]), vec![9, 3]);

    let (_, body) = app.get("/api/products?category=Outerwear&sort=price-desc").await;
    assert_eq!(ids(&body["products"]), vec![5, 4]);

    // Unknown values fall back to the full, newest-first listing.
    let (_, body) = app.get("/api/products?category=Swimwear&sort=popular").await;
    assert_eq!(body["count"], 10);
}

#[tokio::test]
async fn test_product_detail() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Techwear Vest");
    assert_eq!(body["sizes"], json!(["M", "L"]));

    let (status, body) = app.get("/api/products/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/search?q=TEE").await;
    assert_eq!(ids(&body["results"]), vec![3, 9]);
    assert_eq!(body["trending"], json!([]));

    let (_, body) = app.get("/api/search?q=accessories").await;
    assert_eq!(ids(&body["results"]), vec![6]);

    let (_, body) = app.get("/api/search").await;
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["trending"].as_array().unwrap().len(), TRENDING_TAGS.len());
}

#[tokio::test]
async fn test_cart_add_merges_lines() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/cart/add",
            json!({"product_id": 3, "size": "M", "quantity": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["type"], "cart_changed");

    let (_, body) = app
        .post(
            "/api/cart/add",
            json!({"product_id": 3, "size": "M", "quantity": 3}),
        )
        .await;
    assert_eq!(body["view"]["cart"]["count"], 5);
    assert_eq!(body["view"]["cart"]["total"], 2_250_000);

    let (_, cart) = app.get("/api/cart").await;
    let lines = cart["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["key"], "3-M");
    assert_eq!(lines[0]["quantity"], 5);

    let (_, count) = app.get("/api/cart/count").await;
    assert_eq!(count, json!({"count": 5}));
}

#[tokio::test]
async fn test_cart_rejects_bad_sizes() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/cart/add", json!({"product_id": 3}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "size_required");

    let (status, body) = app
        .post("/api/cart/add", json!({"product_id": 3, "size": "XXL"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "unknown_size");

    let (status, body) = app
        .post("/api/cart/add", json!({"product_id": 77, "size": "M"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "unknown_product");

    let (_, count) = app.get("/api/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_cart_update_and_remove() {
    let app = TestApp::new();
    app.post(
        "/api/cart/add",
        json!({"product_id": 6, "size": "One Size", "quantity": 1}),
    )
    .await;

    let (_, body) = app
        .post("/api/cart/update", json!({"key": "6-One Size", "delta": 2}))
        .await;
    assert_eq!(body["view"]["cart"]["count"], 3);

    // Clamp policy: a decrement past one leaves the line alone.
    let (_, body) = app
        .post("/api/cart/update", json!({"key": "6-One Size", "delta": -5}))
        .await;
    assert_eq!(body["events"], json!([]));
    assert_eq!(body["view"]["cart"]["count"], 3);

    let (status, body) = app
        .post("/api/cart/update", json!({"key": "six", "delta": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_line_key");

    let (_, body) = app
        .post("/api/cart/remove", json!({"key": "6-One Size"}))
        .await;
    assert_eq!(body["view"]["cart"]["count"], 0);

    // Removing an absent line is a no-op.
    let (status, body) = app
        .post("/api/cart/remove", json!({"key": "6-One Size"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));
}

#[tokio::test]
async fn test_wishlist_endpoints() {
    let app = TestApp::new();
    let (_, body) = app.post("/api/wishlist/like", json!({"product_id": 1})).await;
    assert_eq!(body["events"][0], json!({"type": "wishlist_changed", "count": 1}));

    // Liking twice keeps one entry and emits nothing.
    let (_, body) = app.post("/api/wishlist/like", json!({"product_id": 1})).await;
    assert_eq!(body["events"], json!([]));

    let (status, body) = app
        .post("/api/wishlist/move-to-cart", json!({"product_id": 1}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "size_selection_required");

    let (_, view) = app.get("/api/view").await;
    assert_eq!(view["product_detail"]["id"], 1);
    assert_eq!(view["wishlist"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .post(
            "/api/wishlist/move-to-cart",
            json!({"product_id": 1, "size": "L"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["cart"]["lines"][0]["key"], "1-L");
    assert_eq!(body["view"]["wishlist"], json!([]));

    let (status, body) = app
        .post("/api/wishlist/unlike", json!({"product_id": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));

    let (_, wishlist) = app.get("/api/wishlist").await;
    assert_eq!(wishlist, json!([]));
}

#[tokio::test]
async fn test_generic_command_endpoint() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/commands", json!({"type": "open_drawer", "drawer": "search"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0], json!({"type": "drawer_changed", "drawer": "search"}));
    assert_eq!(body["view"]["search"]["results"], json!([]));

    let (_, body) = app
        .post("/api/commands", json!({"type": "set_search_query", "query": "cargo"}))
        .await;
    assert_eq!(ids(&body["view"]["search"]["results"]), vec![2]);

    let (_, body) = app
        .post("/api/commands", json!({"type": "set_category", "category": "Bottoms"}))
        .await;
    assert_eq!(body["events"][0]["result_count"], 2);
    assert_eq!(ids(&body["view"]["products"]), vec![2, 10]);

    let (status, _) = app
        .post("/api/commands", json!({"type": "teleport"}))
        .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_checkout_endpoint() {
    let app = TestApp::with_options(Default::default(), Duration::from_millis(20));
    let mut events = app.session.subscribe();

    let (status, body) = app.post("/api/checkout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));

    app.post(
        "/api/cart/add",
        json!({"product_id": 8, "size": "42", "quantity": 1}),
    )
    .await;
    let (status, body) = app.post("/api/checkout", json!({})).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["events"][0]["type"], "checkout_started");
    assert_eq!(body["events"][0]["order"], "VIBE-8888");
    assert_eq!(body["view"]["checkout"]["state"], "processing");

    // A second checkout while processing is ignored.
    let (status, body) = app.post("/api/checkout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));

    loop {
        if let vibe_storefront::store::Event::OrderConfirmed { order, .. } =
            events.recv().await.unwrap()
        {
            assert_eq!(order.as_str(), "VIBE-8888");
            break;
        }
    }

    let (_, view) = app.get("/api/view").await;
    assert_eq!(view["cart"]["count"], 0);
    assert_eq!(view["checkout"]["state"], "idle");
    app.shutdown().await;
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new();
    let response = {
        use tower::ServiceExt;
        app.router
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .header("x-request-id", "trace-me")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    };
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}
