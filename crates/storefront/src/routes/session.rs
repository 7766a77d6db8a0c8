//! Generic session handlers.
//!
//! `POST /api/commands` accepts any [`Command`] in its tagged JSON form, e.g.
//! `{"type": "open_drawer", "drawer": "cart"}`. The narrower endpoints in the
//! sibling modules are shorthands for the common ones.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::session::CommandOutcome;
use crate::state::AppState;
use crate::store::{Command, StorefrontView};

/// Current storefront view.
pub async fn view(State(state): State<AppState>) -> Json<StorefrontView> {
    Json(state.session().view())
}

/// Apply a command.
#[instrument(skip(state))]
pub async fn command(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> Result<Json<CommandOutcome>> {
    let outcome = state.session().dispatch(command).await?;
    Ok(Json(outcome))
}
