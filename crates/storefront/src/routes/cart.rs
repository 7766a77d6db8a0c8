//! Cart route handlers.
//!
//! Mutations go through the shopping session and answer with the events they
//! caused plus the refreshed view.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vibe_core::ProductId;

use crate::error::Result;
use crate::session::CommandOutcome;
use crate::state::AppState;
use crate::store::{CartView, Command};

const fn default_quantity() -> u32 {
    1
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Quantity adjustment request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub key: String,
    pub delta: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub key: String,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Cart contents.
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(state.session().view().cart)
}

/// Add an item to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::AddToCart {
            product_id: body.product_id,
            size: body.size,
            quantity: body.quantity,
        })
        .await?;
    Ok(Json(outcome))
}

/// Adjust a line's quantity by a signed delta.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::UpdateQuantity {
            key: body.key,
            delta: body.delta,
        })
        .await?;
    Ok(Json(outcome))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state
        .session()
        .dispatch(Command::RemoveFromCart { key: body.key })
        .await?;
    Ok(Json(outcome))
}

/// Cart item count badge.
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.session().view().cart.count,
    })
}
