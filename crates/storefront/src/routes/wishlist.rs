//! Wishlist route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;
use vibe_core::{Product, ProductId};

use crate::error::Result;
use crate::session::CommandOutcome;
use crate::state::AppState;
use crate::store::Command;

/// Request body naming a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

/// Move to cart request body.
#[derive(Debug, Deserialize)]
pub struct MoveToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
}

/// Wishlist contents.
pub async fn show(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.session().view().wishlist)
}

/// Add a product to the wishlist.
#[instrument(skip(state))]
pub async fn like(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::Like {
            product_id: body.product_id,
        })
        .await?;
    Ok(Json(outcome))
}

/// Remove a product from the wishlist.
#[instrument(skip(state))]
pub async fn unlike(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::Unlike {
            product_id: body.product_id,
        })
        .await?;
    Ok(Json(outcome))
}

/// Move a wishlisted product into the cart.
///
/// Fails with `size_selection_required` when the product offers several
/// sizes and none was given; the product detail is opened in the session.
#[instrument(skip(state))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Json(body): Json<MoveToCartRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::MoveToCart {
            product_id: body.product_id,
            size: body.size,
        })
        .await?;
    Ok(Json(outcome))
}
