//! Product route handlers.
//!
//! Listings are stateless: the query string picks the category and sort, so
//! they never disturb the shopper's own filters in the session.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vibe_core::{Product, ProductId};

use crate::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub query: ProductQuery,
    pub count: usize,
    pub products: Vec<Product>,
}

/// List products.
///
/// Unknown categories and sort keys fall back to the defaults.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ProductList> {
    let query = ProductQuery::from_params(params.category.as_deref(), params.sort.as_deref());
    let products: Vec<Product> = state
        .catalog()
        .query(query)
        .into_iter()
        .cloned()
        .collect();

    Json(ProductList {
        query,
        count: products.len(),
        products,
    })
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Product>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
