//! Catalog product document.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Categories offered in the shop's filter bar and the admin editor.
pub const CATEGORIES: [&str; 5] = [
    "Cupcakes",
    "Sundaes",
    "Cakes & Pastries",
    "Breads",
    "Coffee & Shakes",
];

/// A product in the catalog.
///
/// Field names are camelCase on the wire so stored documents round-trip
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base price.
    pub price: Price,
    /// Discounted price; only honored when positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Price>,
    #[serde(default)]
    pub category: String,
    /// Image URL. May be empty; views substitute a placeholder.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_best_seller: bool,
    /// Admin-controlled position in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

impl Product {
    /// The per-unit price charged for this product.
    ///
    /// A sale price wins whenever it is present and positive.
    #[must_use]
    pub fn line_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale.is_positive() => sale,
            _ => self.price,
        }
    }

    /// Whether a usable sale price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale.is_positive())
    }
}

/// Category selection on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a `?category=` query value. Missing, blank, or `All` selects everything.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "All") => Self::All,
            Some(name) => Self::Named(name.to_owned()),
        }
    }

    /// Label shown in the filter bar.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Named(name) => name,
        }
    }

    /// Whether a product belongs to this selection.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }
}
