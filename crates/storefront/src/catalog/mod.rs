//! The product catalog.
//!
//! A [`Catalog`] is an immutable, validated list of products loaded once at
//! startup. It comes either from the seed dataset compiled into this crate or
//! from a JSON file with the same shape.
//!
//! Cloning a catalog is cheap: the products live behind an `Arc`.

mod filter;
mod search;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};
use vibe_core::{Product, ProductId};

pub use filter::{ProductQuery, derive_view};
pub use search::{TRENDING_TAGS, search};

/// Seed dataset shipped with the storefront.
const BUILTIN_CATALOG: &str = include_str!("../../data/products.json");

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    #[error("product {0} has an empty name")]
    EmptyName(ProductId),

    #[error("product {0} has an empty size label")]
    EmptySize(ProductId),

    #[error("product {id} lists size {size:?} more than once")]
    DuplicateSize { id: ProductId, size: String },
}

/// An immutable, validated product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if product IDs are not unique, a name is empty, or a
    /// product's size labels are empty or repeated.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            validate_product(product)?;
        }

        Ok(Self {
            products: products.into(),
        })
    }

    /// The seed catalog compiled into the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded dataset is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_json(&json)?;
        debug!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise fall back to the seed catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`] and [`Catalog::builtin`].
    pub async fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Self::builtin(),
        }
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Filtered and sorted view of the catalog.
    #[must_use]
    pub fn query(&self, query: ProductQuery) -> Vec<&Product> {
        derive_view(&self.products, query)
    }

    /// Products whose name or category contains `text`.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<&Product> {
        search(&self.products, text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    if product.name.trim().is_empty() {
        return Err(CatalogError::EmptyName(product.id));
    }

    let mut sizes = HashSet::with_capacity(product.sizes.len());
    for size in &product.sizes {
        if size.trim().is_empty() {
            return Err(CatalogError::EmptySize(product.id));
        }
        if !sizes.insert(size.as_str()) {
            return Err(CatalogError::DuplicateSize {
                id: product.id,
                size: size.clone(),
            });
        }
    }

    Ok(())
}
