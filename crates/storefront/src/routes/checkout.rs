//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::session::CommandOutcome;
use crate::state::AppState;
use crate::store::{Command, Event};

/// Start checkout.
///
/// Answers `202 Accepted` when an order was handed to the payment gateway.
/// An empty cart or an order already in flight is a no-op answered with
/// `200 OK` and no events.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<(StatusCode, Json<CommandOutcome>)> {
    let outcome = state.session().dispatch(Command::Checkout).await?;

    let started = outcome.events.iter().find_map(|event| match event {
        Event::CheckoutStarted { order, .. } => Some(order.to_string()),
        _ => None,
    });
    let status = match started {
        Some(order) => {
            add_breadcrumb("checkout", "Checkout started", Some(&[("order", order.as_str())]));
            StatusCode::ACCEPTED
        }
        None => StatusCode::OK,
    };

    Ok((status, Json(outcome)))
}
