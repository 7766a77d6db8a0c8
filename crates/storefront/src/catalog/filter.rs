//! Category filter and sort deriver for the product listing.

use serde::{Deserialize, Serialize};
use vibe_core::{CategoryFilter, Product, SortKey};

/// The active listing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: SortKey,
}

impl ProductQuery {
    #[must_use]
    pub const fn new(category: CategoryFilter, sort: SortKey) -> Self {
        Self { category, sort }
    }

    /// Build a query from raw request parameters.
    ///
    /// Missing or unrecognized values fall back to "All" and "newest".
    #[must_use]
    pub fn from_params(category: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            category: category.map(CategoryFilter::parse_lenient).unwrap_or_default(),
            sort: sort.map(SortKey::parse_lenient).unwrap_or_default(),
        }
    }
}

/// Filter `products` by category and order them by the sort key.
///
/// - `Newest`: products flagged new come first, each group by descending ID.
/// - `PriceAsc` / `PriceDesc`: by price; the sort is stable, so equal prices
///   keep catalog order.
#[must_use]
pub fn derive_view(products: &[Product], query: ProductQuery) -> Vec<&Product> {
    let mut result: Vec<&Product> = products
        .iter()
        .filter(|p| query.category.matches(p.category))
        .collect();

    match query.sort {
        SortKey::Newest => {
            result.sort_by(|a, b| b.is_new.cmp(&a.is_new).then_with(|| b.id.cmp(&a.id)));
        }
        SortKey::PriceAsc => result.sort_by_key(|p| p.price),
        SortKey::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vibe_core::{Category, ProductId};

    use super::*;
    use crate::catalog::Catalog;
    use crate::catalog::tests::product;

    fn ids(view: &[&Product]) -> Vec<u32> {
        view.iter().map(|p| p.id.as_u32()).collect()
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, 450_000, Category::TShirts, false),
            product(7, 780_000, Category::Tops, true),
        ]
    }

    #[test]
    fn test_newest_puts_new_items_first() {
        let products = sample();
        let view = derive_view(&products, ProductQuery::default());
        assert_eq!(ids(&view), vec![7, 1]);
    }

    #[test]
    fn test_price_asc() {
        let products = sample();
        let view = derive_view(
            &products,
            ProductQuery::new(CategoryFilter::All, SortKey::PriceAsc),
        );
        assert_eq!(ids(&view), vec![1, 7]);
    }

    #[test]
    fn test_newest_on_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let view = catalog.query(ProductQuery::default());
        // New drops (7, 2, 1) first, then the rest by descending id.
        assert_eq!(ids(&view), vec![7, 2, 1, 10, 9, 8, 6, 5, 4, 3]);
    }

    #[test]
    fn test_newest_is_idempotent() {
        let catalog = Catalog::builtin().unwrap();
        let once: Vec<Product> = catalog
            .query(ProductQuery::default())
            .into_iter()
            .cloned()
            .collect();
        let twice = derive_view(&once, ProductQuery::default());
        assert_eq!(ids(&twice), ids(&once.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn test_category_filter_independent_of_sort() {
        let catalog = Catalog::builtin().unwrap();
        let mut by_sort: Vec<Vec<u32>> = SortKey::ALL
            .into_iter()
            .map(|sort| {
                let view = catalog.query(ProductQuery::new(
                    CategoryFilter::Only(Category::Outerwear),
                    sort,
                ));
                assert!(view.iter().all(|p| p.category == Category::Outerwear));
                let mut found = ids(&view);
                found.sort_unstable();
                found
            })
            .collect();
        by_sort.dedup();
        assert_eq!(by_sort, vec![vec![4, 5]]);
    }

    #[test]
    fn test_price_desc_reverses_price_asc() {
        let catalog = Catalog::builtin().unwrap();
        let asc: Vec<u64> = catalog
            .query(ProductQuery::new(CategoryFilter::All, SortKey::PriceAsc))
            .iter()
            .map(|p| p.price.amount())
            .collect();
        let mut desc: Vec<u64> = catalog
            .query(ProductQuery::new(CategoryFilter::All, SortKey::PriceDesc))
            .iter()
            .map(|p| p.price.amount())
            .collect();
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_equal_prices_keep_catalog_order() {
        let products = vec![
            product(3, 100, Category::Tops, false),
            product(1, 100, Category::Tops, false),
            product(2, 50, Category::Tops, false),
        ];
        let view = derive_view(
            &products,
            ProductQuery::new(CategoryFilter::All, SortKey::PriceAsc),
        );
        assert_eq!(ids(&view), vec![2, 3, 1]);
    }

    #[test]
    fn test_empty_category_yields_empty_view() {
        let products = sample();
        let view = derive_view(
            &products,
            ProductQuery::new(CategoryFilter::Only(Category::Footwear), SortKey::Newest),
        );
        assert!(view.is_empty());
    }

    #[test]
    fn test_from_params_degrades_unknown_values() {
        let query = ProductQuery::from_params(Some("Socks"), Some("random"));
        assert_eq!(query, ProductQuery::default());

        let query = ProductQuery::from_params(Some("Footwear"), Some("price-desc"));
        assert_eq!(query.category, CategoryFilter::Only(Category::Footwear));
        assert_eq!(query.sort, SortKey::PriceDesc);
        assert_eq!(
            derive_view(&[product(8, 1, Category::Footwear, false)], query)
                .first()
                .map(|p| p.id),
            Some(ProductId::new(8))
        );
    }
}
