//! Core types for the VIBE storefront.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;
pub mod sort;

pub use category::{Category, CategoryFilter, ParseCategoryError};
pub use id::*;
pub use price::{CurrencyCode, ParseCurrencyError, Price};
pub use product::Product;
pub use sort::{ParseSortKeyError, SortKey};
