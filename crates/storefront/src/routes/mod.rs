//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (session running)
//!
//! # Session
//! GET  /api/view                 - Current storefront view
//! POST /api/commands             - Apply any command
//!
//! # Products
//! GET  /api/products             - Listing (?category=..&sort=..)
//! GET  /api/products/{id}        - Product detail
//! GET  /api/search               - Search (?q=..)
//!
//! # Cart
//! GET  /api/cart                 - Cart contents
//! POST /api/cart/add             - Add a line
//! POST /api/cart/update          - Adjust a line quantity
//! POST /api/cart/remove          - Remove a line
//! GET  /api/cart/count           - Cart item count
//!
//! # Checkout
//! POST /api/checkout             - Start checkout
//!
//! # Wishlist
//! GET  /api/wishlist             - Wishlist contents
//! POST /api/wishlist/like        - Add a product
//! POST /api/wishlist/unlike      - Remove a product
//! POST /api/wishlist/move-to-cart - Move a product into the cart
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;
pub mod search;
pub mod session;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/like", post(wishlist::like))
        .route("/unlike", post(wishlist::unlike))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/view", get(session::view))
        .route("/commands", post(session::command))
        .nest("/products", product_routes())
        .route("/search", get(search::search))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
        .nest("/wishlist", wishlist_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
