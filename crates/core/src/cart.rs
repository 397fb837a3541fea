//! Shopping cart lines and quantity rules.
//!
//! A cart is owned by one visitor session and never persisted to the catalog
//! store. Every line holds a snapshot of the product taken when it was first
//! added, plus a quantity that is always at least one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Product, ProductId};

/// Rejected quantity change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// No line for this product.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The change would leave the line at zero or below.
    #[error("quantity {current} cannot change by {delta}")]
    WouldEmptyLine { current: u32, delta: i32 },
}

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.line_price().times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the product has a line in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| item.product.id == *id)
    }

    /// Add one unit of a product, creating the line if needed.
    ///
    /// Returns the line's new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.line_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove a line entirely. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != *id);
        self.items.len() != before
    }

    /// Change a line's quantity by `delta`.
    ///
    /// A change that would bring the quantity to zero or below is rejected and
    /// the line is left as it was; removal is a separate operation.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotInCart` if the product has no line, and
    /// `QuantityError::WouldEmptyLine` if the result would not be positive.
    pub fn update_quantity(&mut self, id: &ProductId, delta: i32) -> Result<u32, QuantityError> {
        let item = self
            .line_mut(id)
            .ok_or_else(|| QuantityError::NotInCart(id.clone()))?;

        let next = i64::from(item.quantity) + i64::from(delta);
        let next = u32::try_from(next)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(QuantityError::WouldEmptyLine {
                current: item.quantity,
                delta,
            })?;

        item.quantity = next;
        Ok(next)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Sum of line price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product.id == *id)
    }
}
