//! Shopping cart store.
//!
//! Line items are keyed by product ID plus selected size. Adding the same
//! product and size again grows the existing line instead of creating a new
//! one. Every line holds a snapshot of the product taken when it was first
//! added, and lines keep insertion order.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vibe_core::{Price, Product, ProductId};

/// Errors raised by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity to add must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product offers sizes but none was selected.
    #[error("product {product_id} requires a size")]
    SizeRequired { product_id: ProductId },

    /// The selected size is not offered by the product.
    #[error("product {product_id} has no size {size:?}")]
    UnknownSize { product_id: ProductId, size: String },
}

/// Error returned when a line key string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid line key: {0:?}")]
pub struct ParseLineKeyError(pub String);

/// Composite key of a cart line: product ID and selected size.
///
/// Rendered as `"{product_id}-{size}"`, e.g. `"3-M"` or `"6-One Size"`.
/// Products without sizes use the empty size (`"6-"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineKey {
    product_id: ProductId,
    size: String,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.product_id, self.size)
    }
}

impl FromStr for LineKey {
    type Err = ParseLineKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, size) = s
            .split_once('-')
            .ok_or_else(|| ParseLineKeyError(s.to_string()))?;
        let product_id = id
            .parse::<ProductId>()
            .map_err(|_| ParseLineKeyError(s.to_string()))?;
        Ok(Self::new(product_id, size))
    }
}

impl TryFrom<String> for LineKey {
    type Error = ParseLineKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LineKey> for String {
    fn from(key: LineKey) -> Self {
        key.to_string()
    }
}

/// What happens when a decrement would take a line to zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// Leave the quantity unchanged; removal needs an explicit remove.
    #[default]
    Clamp,
    /// Remove the line.
    Remove,
}

/// Error returned when a quantity policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quantity policy {0:?} (expected \"clamp\" or \"remove\")")]
pub struct ParseQuantityPolicyError(pub String);

impl FromStr for QuantityPolicy {
    type Err = ParseQuantityPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "remove" => Ok(Self::Remove),
            _ => Err(ParseQuantityPolicyError(s.to_string())),
        }
    }
}

/// Result of [`CartStore::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated(u32),
    /// The decrement was refused by [`QuantityPolicy::Clamp`].
    Unchanged(u32),
    /// The line was removed by [`QuantityPolicy::Remove`].
    Removed,
    /// No line has that key.
    Missing,
}

/// One cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    key: LineKey,
    product: Product,
    quantity: u32,
}

impl LineItem {
    #[must_use]
    pub const fn key(&self) -> &LineKey {
        &self.key
    }

    /// The product as it was when first added.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn size(&self) -> &str {
        self.key.size()
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Check that `size` is a valid selection for `product`.
///
/// # Errors
///
/// Returns [`CartError::SizeRequired`] when the product has sizes and `size`
/// is empty, and [`CartError::UnknownSize`] when `size` is not one of the
/// product's labels (products without sizes only accept the empty size).
pub fn validate_size(product: &Product, size: &str) -> Result<(), CartError> {
    if product.has_sizes() {
        if size.is_empty() {
            return Err(CartError::SizeRequired {
                product_id: product.id,
            });
        }
        if !product.offers_size(size) {
            return Err(CartError::UnknownSize {
                product_id: product.id,
                size: size.to_string(),
            });
        }
    } else if !size.is_empty() {
        return Err(CartError::UnknownSize {
            product_id: product.id,
            size: size.to_string(),
        });
    }
    Ok(())
}

/// The cart: ordered line items with unique keys.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<LineItem>,
}

impl CartStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of `product` in `size`.
    ///
    /// Returns the line's quantity after the add.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity, or a size
    /// error from [`validate_size`].
    pub fn add(&mut self, product: &Product, size: &str, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        validate_size(product, size)?;

        let key = LineKey::new(product.id, size);
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(line.quantity);
        }

        self.lines.push(LineItem {
            key,
            product: product.clone(),
            quantity,
        });
        Ok(quantity)
    }

    /// Remove a line. Absent keys are ignored.
    pub fn remove(&mut self, key: &LineKey) -> Option<LineItem> {
        let pos = self.lines.iter().position(|l| &l.key == key)?;
        Some(self.lines.remove(pos))
    }

    /// Adjust a line's quantity by `delta`.
    ///
    /// A result of zero or less is resolved by `policy`.
    pub fn update_quantity(
        &mut self,
        key: &LineKey,
        delta: i64,
        policy: QuantityPolicy,
    ) -> QuantityChange {
        let Some(pos) = self.lines.iter().position(|l| &l.key == key) else {
            return QuantityChange::Missing;
        };
        let Some(line) = self.lines.get_mut(pos) else {
            return QuantityChange::Missing;
        };

        let next = i64::from(line.quantity).saturating_add(delta);
        if next > 0 {
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            return QuantityChange::Updated(line.quantity);
        }

        match policy {
            QuantityPolicy::Clamp => QuantityChange::Unchanged(line.quantity),
            QuantityPolicy::Remove => {
                self.lines.remove(pos);
                QuantityChange::Removed
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|l| &l.key == key)
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of price times quantity, in minor units.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
