//! Integration tests for VIBE.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vibe-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_routes` - JSON API driven through the full router
//! - `session_flow` - Shopping journeys against a running session
//!
//! Everything runs in-process: [`TestApp`] spawns a session over the built-in
//! catalog and drives the router with `tower::ServiceExt::oneshot`, so no
//! server or network is needed.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use vibe_storefront::catalog::Catalog;
use vibe_storefront::config::StorefrontConfig;
use vibe_storefront::services::SimulatedGateway;
use vibe_storefront::session::{self, SessionHandle, SessionTiming};
use vibe_storefront::state::AppState;
use vibe_storefront::store::{Checkout, StoreOptions, Storefront};

/// First order number handed out by a [`TestApp`].
pub const FIRST_ORDER: u32 = 8888;

/// An in-process storefront: router plus the session behind it.
pub struct TestApp {
    pub router: Router,
    pub session: SessionHandle,
    task: JoinHandle<()>,
}

impl TestApp {
    /// Start an app with default options and a short checkout delay.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog fails to load.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default(), Duration::from_millis(50))
    }

    /// Start an app with the given storefront options and payment delay.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog fails to load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_options(options: StoreOptions, checkout_delay: Duration) -> Self {
        let catalog = Catalog::builtin().expect("built-in catalog is valid");
        let store = Storefront::new(catalog.clone(), options)
            .with_checkout(Checkout::starting_at(FIRST_ORDER));
        let timing = SessionTiming {
            confirmation_delay: Duration::from_millis(10),
        };
        let (session, task) = session::spawn(
            store,
            Arc::new(SimulatedGateway::new(checkout_delay)),
            timing,
        );

        let config = StorefrontConfig {
            store: options,
            checkout_delay,
            session: timing,
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, catalog, session.clone());

        Self {
            router: vibe_storefront::app(state),
            session,
            task,
        }
    }

    /// Send a GET request and decode the JSON response.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Send a request; a non-JSON response body decodes as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }

    /// Stop the session and wait for it to finish.
    ///
    /// # Panics
    ///
    /// Panics if the session task panicked.
    #[allow(clippy::expect_used)]
    pub async fn shutdown(self) {
        self.session.shutdown();
        self.task.await.expect("session task completes");
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
