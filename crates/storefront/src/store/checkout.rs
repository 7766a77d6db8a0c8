//! Checkout state machine.
//!
//! ```text
//! Idle ──(checkout, cart non-empty)──→ Processing { order }
//!   ↑                                        │
//!   └──────(payment settled / cancelled)─────┘
//! ```
//!
//! The machine only tracks which order is in flight. Talking to a payment
//! gateway is the session's job; it reports back through [`Checkout::settle`].

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vibe_core::Price;

use super::cart::{CartStore, LineItem};

/// Prefix of every order reference.
const ORDER_PREFIX: &str = "VIBE";

/// Human-readable order reference, e.g. `VIBE-8888`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(format!("{ORDER_PREFIX}-{number}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the checkout flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Processing { order: OrderRef },
}

/// Snapshot of the cart handed to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingOrder {
    pub order: OrderRef,
    pub lines: Vec<LineItem>,
    pub item_count: u64,
    pub total: Price,
}

/// Proof that an order was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub order: OrderRef,
    pub item_count: u64,
    pub total: Price,
    pub paid_at: DateTime<Utc>,
}

impl PaymentReceipt {
    /// Receipt for a pending order, paid now.
    #[must_use]
    pub fn for_order(pending: &PendingOrder) -> Self {
        Self {
            order: pending.order.clone(),
            item_count: pending.item_count,
            total: pending.total,
            paid_at: Utc::now(),
        }
    }
}

/// Why a payment did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment provider unavailable: {0}")]
    Unavailable(String),
}

/// The checkout state machine.
#[derive(Debug, Clone)]
pub struct Checkout {
    phase: CheckoutPhase,
    next_order: u32,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkout {
    /// Start with a random four-digit order number.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(rand::random_range(1000..9000))
    }

    /// Start numbering orders at `first_order`.
    #[must_use]
    pub const fn starting_at(first_order: u32) -> Self {
        Self {
            phase: CheckoutPhase::Idle,
            next_order: first_order,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.phase, CheckoutPhase::Processing { .. })
    }

    /// The order currently in flight, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&OrderRef> {
        match &self.phase {
            CheckoutPhase::Processing { order } => Some(order),
            CheckoutPhase::Idle => None,
        }
    }

    /// Move to `Processing` and snapshot the cart.
    ///
    /// Returns `None`, leaving the phase untouched, when the cart is empty or
    /// an order is already in flight.
    pub fn begin(&mut self, cart: &CartStore) -> Option<PendingOrder> {
        if cart.is_empty() || self.is_processing() {
            return None;
        }

        let order = OrderRef::new(self.next_order);
        self.next_order = self.next_order.wrapping_add(1);
        self.phase = CheckoutPhase::Processing {
            order: order.clone(),
        };

        Some(PendingOrder {
            order,
            lines: cart.lines().to_vec(),
            item_count: cart.count(),
            total: cart.total(),
        })
    }

    /// Return to `Idle` if `order` is the one in flight.
    ///
    /// Returns `false` for a stale or unknown order, which leaves the phase
    /// untouched.
    pub fn settle(&mut self, order: &OrderRef) -> bool {
        if self.in_flight() != Some(order) {
            return false;
        }
        self.phase = CheckoutPhase::Idle;
        true
    }
}
