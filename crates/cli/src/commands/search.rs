//! Product search command.

use vibe_core::CurrencyCode;
use vibe_storefront::catalog::{Catalog, TRENDING_TAGS};

use super::product_row;

/// Print search results, or the trending tags for a blank query.
#[allow(clippy::print_stdout)]
pub fn run(catalog: &Catalog, query: &str, currency: CurrencyCode) {
    if query.trim().is_empty() {
        println!("Trending: {}", TRENDING_TAGS.join(", "));
        return;
    }

    let results = catalog.search(query);
    if results.is_empty() {
        println!("No products match {:?}", query.trim());
        return;
    }
    for product in results {
        println!("{}", product_row(product, currency));
    }
}
