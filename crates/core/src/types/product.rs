//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ProductId;
use super::price::Price;

/// A product as listed in the catalog.
///
/// Products are immutable once loaded; carts and wishlists hold clones so a
/// later catalog reload never rewrites what a shopper already picked.
///
/// The JSON shape matches the catalog feed:
///
/// ```
/// use vibe_core::{Category, Product};
///
/// let product: Product = serde_json::from_str(r#"{
///     "id": 6,
///     "name": "Essential Cap",
///     "price": 320000,
///     "category": "Accessories",
///     "image": "https://picsum.photos/800/1000?random=6",
///     "sizes": ["One Size"]
/// }"#).unwrap();
///
/// assert_eq!(product.category, Category::Accessories);
/// assert!(!product.is_new);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: Category,
    /// Opaque image reference, resolved by whoever renders the product.
    pub image: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Size labels offered for this product. Empty means "no size choice".
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl Product {
    /// Whether the shopper has to pick a size before adding to cart.
    #[must_use]
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether `size` is one of this product's labels.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// The size to use when the shopper gave none: the only size, or the
    /// empty size for products without sizes.
    #[must_use]
    pub fn implied_size(&self) -> Option<&str> {
        match self.sizes.as_slice() {
            [] => Some(""),
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}
