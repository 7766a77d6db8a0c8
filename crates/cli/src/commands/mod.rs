//! CLI command implementations.

pub mod catalog;
pub mod checkout;
pub mod search;

use vibe_core::{CurrencyCode, Product};

/// One listing row: id, name, category, price and a `NEW` marker.
pub fn product_row(product: &Product, currency: CurrencyCode) -> String {
    format!(
        "{:>4}  {:<28} {:<12} {:>14}{}",
        product.id.as_u32(),
        product.name,
        product.category.label(),
        currency.format(product.price),
        if product.is_new { "  NEW" } else { "" },
    )
}
