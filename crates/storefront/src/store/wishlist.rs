//! Wishlist store: liked products keyed by product ID.

use thiserror::Error;
use vibe_core::{Product, ProductId};

/// Errors raised when moving a wishlist entry to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WishlistError {
    /// The product is not in the wishlist.
    #[error("product {product_id} is not in the wishlist")]
    NotInWishlist { product_id: ProductId },

    /// The product has several sizes and none was chosen.
    #[error("choose a size for product {product_id} before adding it to the cart")]
    SizeSelectionRequired { product_id: ProductId },
}

/// Liked products, in the order they were liked.
#[derive(Debug, Clone, Default)]
pub struct WishlistStore {
    entries: Vec<Product>,
}

impl WishlistStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Like a product. Returns `false` if it was already liked.
    pub fn like(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(product.clone());
        true
    }

    /// Unlike a product. Absent IDs are ignored.
    pub fn unlike(&mut self, id: ProductId) -> Option<Product> {
        let pos = self.entries.iter().position(|p| p.id == id)?;
        Some(self.entries.remove(pos))
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.entries.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the size a wishlist entry moves into the cart with.
///
/// An explicit size wins. Otherwise a single-size product uses that size and
/// a product without sizes uses the empty size. Anything else needs the
/// shopper to choose.
///
/// # Errors
///
/// Returns [`WishlistError::SizeSelectionRequired`] when no size can be implied.
pub fn resolve_move_size(product: &Product, requested: Option<&str>) -> Result<String, WishlistError> {
    if let Some(size) = requested.filter(|s| !s.is_empty()) {
        return Ok(size.to_string());
    }
    product
        .implied_size()
        .map(ToString::to_string)
        .ok_or(WishlistError::SizeSelectionRequired {
            product_id: product.id,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vibe_core::Category;

    use super::*;
    use crate::catalog::tests::product;

    #[test]
    fn test_like_is_idempotent() {
        let mut wishlist = WishlistStore::new();
        let p = product(1, 100, Category::Tops, false);
        assert!(wishlist.like(&p));
        assert!(!wishlist.like(&p));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_unlike() {
        let mut wishlist = WishlistStore::new();
        let p = product(1, 100, Category::Tops, false);
        wishlist.like(&p);
        assert!(wishlist.unlike(ProductId::new(2)).is_none());
        assert_eq!(wishlist.unlike(ProductId::new(1)).unwrap().id, p.id);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_resolve_move_size() {
        let mut p = product(1, 100, Category::Tops, false);
        assert_eq!(resolve_move_size(&p, Some("M")).unwrap(), "M");
        assert_eq!(
            resolve_move_size(&p, None),
            Err(WishlistError::SizeSelectionRequired {
                product_id: ProductId::new(1)
            })
        );
        assert!(resolve_move_size(&p, Some("")).is_err());

        p.sizes = vec!["One Size".into()];
        assert_eq!(resolve_move_size(&p, None).unwrap(), "One Size");

        p.sizes.clear();
        assert_eq!(resolve_move_size(&p, None).unwrap(), "");
    }
}
