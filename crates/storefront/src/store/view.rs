//! Read-only projections of storefront state.

use serde::Serialize;
use vibe_core::{CurrencyCode, Price, Product, ProductId};

use super::cart::{CartStore, LineItem, LineKey};
use super::checkout::CheckoutPhase;
use super::overlay::Drawer;
use crate::catalog::ProductQuery;

/// Everything an adapter needs to render the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorefrontView {
    pub currency: CurrencyCode,
    pub query: ProductQuery,
    pub products: Vec<Product>,
    pub product_count: usize,
    pub cart: CartView,
    pub wishlist: Vec<Product>,
    pub drawer: Option<Drawer>,
    pub product_detail: Option<Product>,
    /// Present while the search drawer is open.
    pub search: Option<SearchView>,
    pub checkout: CheckoutPhase,
}

/// The cart drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub count: u64,
    pub total: Price,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            count: cart.count(),
            total: cart.total(),
        }
    }
}

/// One cart line, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub key: LineKey,
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub size: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&LineItem> for CartLineView {
    fn from(line: &LineItem) -> Self {
        let product = line.product();
        Self {
            key: line.key().clone(),
            product_id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            size: line.size().to_string(),
            unit_price: product.price,
            quantity: line.quantity(),
            line_total: line.line_total(),
        }
    }
}

/// The search drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<Product>,
    /// Suggestions, only while the query is empty.
    pub trending: Vec<String>,
}
