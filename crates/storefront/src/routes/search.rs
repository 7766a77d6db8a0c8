//! Search route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::TRENDING_TAGS;
use crate::state::AppState;
use crate::store::SearchView;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search the catalog by name or category.
///
/// An empty query returns no results and the trending suggestions.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchView> {
    let results = state
        .catalog()
        .search(&params.q)
        .into_iter()
        .cloned()
        .collect();
    let trending = if params.q.trim().is_empty() {
        TRENDING_TAGS.iter().map(ToString::to_string).collect()
    } else {
        Vec::new()
    };

    Json(SearchView {
        query: params.q,
        results,
        trending,
    })
}
