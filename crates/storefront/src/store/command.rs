//! Commands sent to the storefront and events it emits.
//!
//! Every user intent is a [`Command`]. The storefront applies commands one at
//! a time and reports what changed as [`Event`]s.

use serde::{Deserialize, Serialize};
use vibe_core::{Price, ProductId};

use super::checkout::{OrderRef, PaymentReceipt};
use super::overlay::Drawer;
use crate::catalog::ProductQuery;

const fn default_quantity() -> u32 {
    1
}

/// A user intent.
///
/// Category and sort arrive as raw strings and are parsed leniently, so an
/// unknown value selects the default listing instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetCategory {
        category: String,
    },
    SetSort {
        sort: String,
    },
    ClearFilters,
    OpenProduct {
        product_id: ProductId,
    },
    CloseProduct,
    OpenDrawer {
        drawer: Drawer,
    },
    CloseDrawer,
    SetSearchQuery {
        query: String,
    },
    AddToCart {
        product_id: ProductId,
        #[serde(default)]
        size: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    RemoveFromCart {
        key: String,
    },
    UpdateQuantity {
        key: String,
        delta: i64,
    },
    Like {
        product_id: ProductId,
    },
    Unlike {
        product_id: ProductId,
    },
    MoveToCart {
        product_id: ProductId,
        #[serde(default)]
        size: Option<String>,
    },
    Checkout,
}

/// Something that changed in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    FiltersChanged {
        query: ProductQuery,
        result_count: usize,
    },
    DrawerChanged {
        drawer: Option<Drawer>,
    },
    ProductOpened {
        product_id: ProductId,
    },
    ProductClosed,
    CartChanged {
        count: u64,
        total: Price,
    },
    WishlistChanged {
        count: usize,
    },
    CheckoutStarted {
        order: OrderRef,
        item_count: u64,
        total: Price,
    },
    CheckoutCompleted {
        receipt: PaymentReceipt,
    },
    CheckoutFailed {
        order: OrderRef,
        reason: String,
    },
    CheckoutCancelled {
        order: OrderRef,
    },
    /// Shown to the shopper a moment after a completed checkout.
    OrderConfirmed {
        order: OrderRef,
        message: String,
    },
}
