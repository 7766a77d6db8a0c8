//! Catalog inspection commands.

use std::path::Path;

use thiserror::Error;
use tracing::info;
use vibe_core::{CurrencyCode, ProductId};
use vibe_storefront::catalog::{Catalog, CatalogError, ProductQuery};

use super::product_row;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("Product {0} not found")]
    NotFound(u32),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Print the listing for a category and sort key.
#[allow(clippy::print_stdout)]
pub fn list(catalog: &Catalog, category: Option<&str>, sort: Option<&str>, currency: CurrencyCode) {
    let query = ProductQuery::from_params(category, sort);
    let products = catalog.query(query);

    println!(
        "{} products ({}, {})",
        products.len(),
        query.category.label(),
        query.sort.label()
    );
    for product in products {
        println!("{}", product_row(product, currency));
    }
}

/// Print one product in full.
///
/// # Errors
///
/// Returns an error if no product has this ID.
#[allow(clippy::print_stdout)]
pub fn show(catalog: &Catalog, id: u32, currency: CurrencyCode) -> Result<(), CatalogCommandError> {
    let product = catalog
        .get(ProductId::new(id))
        .ok_or(CatalogCommandError::NotFound(id))?;

    println!("{}", product.name);
    println!("  ID:        {}", product.id);
    println!("  Category:  {}", product.category.label());
    println!("  Price:     {}", currency.format(product.price));
    if product.is_new {
        println!("  New arrival");
    }
    if product.has_sizes() {
        println!("  Sizes:     {}", product.sizes.join(", "));
    }
    if let Some(description) = &product.description {
        println!("  {description}");
    }
    println!("  Image:     {}", product.image);
    Ok(())
}

/// Check that a catalog file parses and passes validation.
///
/// # Errors
///
/// Returns the first read, parse or validation error.
#[allow(clippy::print_stdout)]
pub async fn validate(path: &Path) -> Result<(), CatalogCommandError> {
    let catalog = Catalog::load(path).await?;
    info!(path = %path.display(), products = catalog.len(), "Catalog is valid");
    println!("{}: {} products OK", path.display(), catalog.len());
    Ok(())
}
