//! Overlay state: which drawer is open and which product is being viewed.

use serde::{Deserialize, Serialize};
use vibe_core::ProductId;

/// Primary overlays. At most one is engaged at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drawer {
    Cart,
    Wishlist,
    Search,
}

/// Overlay state owned by the storefront.
///
/// The product detail is layered independently and may sit on top of a drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlays {
    drawer: Option<Drawer>,
    product_detail: Option<ProductId>,
    search_query: String,
}

impl Overlays {
    #[must_use]
    pub const fn drawer(&self) -> Option<Drawer> {
        self.drawer
    }

    #[must_use]
    pub const fn product_detail(&self) -> Option<ProductId> {
        self.product_detail
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Open `drawer`, replacing any other. Returns `false` if it was already open.
    pub fn open_drawer(&mut self, drawer: Drawer) -> bool {
        if self.drawer == Some(drawer) {
            return false;
        }
        self.close_drawer();
        self.drawer = Some(drawer);
        true
    }

    /// Close the open drawer, returning it. Closing search clears its query.
    pub fn close_drawer(&mut self) -> Option<Drawer> {
        let closed = self.drawer.take();
        if closed == Some(Drawer::Search) {
            self.search_query.clear();
        }
        closed
    }

    pub fn open_product(&mut self, id: ProductId) {
        self.product_detail = Some(id);
    }

    pub fn close_product(&mut self) -> Option<ProductId> {
        self.product_detail.take()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }
}
