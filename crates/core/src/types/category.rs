//! Product categories and the catalog category filter.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned by strict category parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

/// The fixed set of catalog categories.
///
/// Serialized with the exact storefront labels (`"T-Shirts"`, not `"t_shirts"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hoodies,
    #[serde(rename = "T-Shirts")]
    TShirts,
    Bottoms,
    Outerwear,
    Accessories,
    Footwear,
    Tops,
}

impl Category {
    /// Every category, in storefront display order.
    pub const ALL: [Self; 7] = [
        Self::Hoodies,
        Self::TShirts,
        Self::Bottoms,
        Self::Outerwear,
        Self::Accessories,
        Self::Footwear,
        Self::Tops,
    ];

    /// The storefront label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hoodies => "Hoodies",
            Self::TShirts => "T-Shirts",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
            Self::Accessories => "Accessories",
            Self::Footwear => "Footwear",
            Self::Tops => "Tops",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive match against the storefront labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// The active category selection: every product, or a single category.
///
/// Serialized as the category label, or `"All"` for the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Wire label of the "all" sentinel.
    pub const ALL_LABEL: &'static str = "All";

    /// Parse a selection, degrading anything unrecognized to [`CategoryFilter::All`].
    ///
    /// ```
    /// use vibe_core::{Category, CategoryFilter};
    ///
    /// assert_eq!(CategoryFilter::parse_lenient("Tops"), CategoryFilter::Only(Category::Tops));
    /// assert_eq!(CategoryFilter::parse_lenient("Swimwear"), CategoryFilter::All);
    /// ```
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse::<Category>().map_or(Self::All, Self::Only)
    }

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    /// The wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(category) => category.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.label().to_string()
    }
}
