//! Search-as-you-type over the catalog.
//!
//! The catalog is small, so this is a linear, case-insensitive substring
//! scan over product names and category labels. No index is kept.

use vibe_core::Product;

/// Suggestions shown while the search box is empty.
pub const TRENDING_TAGS: [&str; 5] = [
    "Hoodie",
    "Cargo Pants",
    "Sneakers",
    "Streetwear",
    "Accessories",
];

/// Products whose name or category label contains `query`, in catalog order.
///
/// A blank query matches nothing.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.category.label().to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn names(results: &[&Product]) -> Vec<String> {
        results.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.search("").is_empty());
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(names(&catalog.search("HOODIE")), vec!["Oversized Cyber Hoodie"]);
    }

    #[test]
    fn test_matches_category_label() {
        let catalog = Catalog::builtin().unwrap();
        let results = catalog.search("outerwear");
        assert_eq!(
            names(&results),
            vec!["Techwear Vest", "Distressed Denim Jacket"]
        );
    }

    #[test]
    fn test_no_match() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.search("Streetwear").is_empty());
    }

    #[test]
    fn test_query_is_trimmed() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(names(&catalog.search("  tee ")).len(), 2);
    }
}
