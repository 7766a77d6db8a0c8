//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (the JSON API is called from browser front ends)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
