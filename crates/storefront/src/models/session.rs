//! Session-related types.
//!
//! Types stored in the visitor's session: the shopper state for the public
//! shop and the admin identity for the admin panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mousse_melts_core::{AppliedCoupon, Cart, LastAdded, Product, ProductId, QuantityError};

/// Everything the shop remembers about one visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopperSession {
    pub cart: Cart,
    /// Whether the cart drawer is open.
    pub cart_open: bool,
    /// Product behind the add-to-cart notification.
    pub last_added: Option<LastAdded>,
    pub applied_coupon: Option<AppliedCoupon>,
    /// Chat link for the order just placed, handed off on the next home page.
    #[serde(default)]
    pub pending_chat: Option<String>,
}

impl ShopperSession {
    /// Add one unit and raise the add-to-cart notification.
    ///
    /// Returns the line's new quantity.
    pub fn add_to_cart(&mut self, product: &Product, now: DateTime<Utc>) -> u32 {
        let quantity = self.cart.add(product);
        self.last_added = Some(LastAdded::new(product.clone(), now));
        quantity
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        self.cart.remove(id)
    }

    /// Change a line's quantity by `delta`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError` if the product is not in the cart or the
    /// quantity would drop to zero; the cart is unchanged in that case.
    pub fn update_quantity(&mut self, id: &ProductId, delta: i32) -> Result<u32, QuantityError> {
        self.cart.update_quantity(id, delta)
    }

    /// Open or close the cart drawer; flip it when `open` is `None`.
    pub const fn toggle_cart(&mut self, open: Option<bool>) {
        self.cart_open = match open {
            Some(open) => open,
            None => !self.cart_open,
        };
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn clear_last_added(&mut self) {
        self.last_added = None;
    }

    /// Take the pending chat link so it is shown only once.
    pub fn take_chat_handoff(&mut self) -> Option<String> {
        self.pending_chat.take()
    }

    /// The notification to show at `now`, with its remaining progress.
    #[must_use]
    pub fn notification(&self, now: DateTime<Utc>) -> Option<(&LastAdded, u8)> {
        self.last_added
            .as_ref()
            .and_then(|added| added.progress(now).map(|progress| (added, progress)))
    }
}

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Session keys.
pub mod keys {
    /// Key for the shopper's cart and UI state.
    pub const SHOPPER: &str = "shopper";

    /// Key for the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the admin's unsaved catalog draft.
    pub const ADMIN_DRAFT: &str = "admin_draft";
}
