//! VIBE storefront library.
//!
//! The storefront engine behind the VIBE streetwear shop: catalog loading and
//! querying, the single-owner shopping session (cart, wishlist, overlays,
//! checkout) and the JSON API that fronts it.
//!
//! ```text
//! HTTP / CLI ──Command──▶ SessionHandle ──▶ session actor ──▶ Storefront
//!            ◀──events + view───────────────┘       │
//!                                                   └──▶ PaymentGateway
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

use axum::{Router, extract::Request, middleware as axum_middleware};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;

use crate::state::AppState;

/// Build the full HTTP application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    routes::routes()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(axum_middleware::from_fn(
                    middleware::request_id_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
