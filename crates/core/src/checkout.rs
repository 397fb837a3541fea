//! Coupon application, order totals, and the chat order message.
//!
//! Everything here is derived from the cart and the applied coupon and is
//! recomputed on every render.

use core::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{Coupon, Price};

/// Shop name used in the order message header.
pub const SHOP_NAME: &str = "Mousse & Melts";

/// A coupon applied to the visitor's checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Code as configured by the admin, not as typed by the shopper.
    pub code: String,
    pub percent: Decimal,
}

impl AppliedCoupon {
    /// Percentage for display, without trailing zeros.
    #[must_use]
    pub fn percent_label(&self) -> String {
        self.percent.normalize().to_string()
    }
}

/// Reasons a coupon could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Please enter a coupon code")]
    EmptyCode,

    #[error("Coupon {0} is already applied; remove it first")]
    AlreadyApplied(String),

    #[error("Invalid or expired coupon code")]
    Invalid,
}

/// Match shopper input against the active coupons.
///
/// Only one coupon may be applied at a time.
///
/// # Errors
///
/// Returns `CouponError::EmptyCode` for blank input,
/// `CouponError::AlreadyApplied` when a coupon is already in effect, and
/// `CouponError::Invalid` when no active coupon matches.
pub fn apply_coupon(
    input: &str,
    coupons: &[Coupon],
    current: Option<&AppliedCoupon>,
) -> Result<AppliedCoupon, CouponError> {
    if input.trim().is_empty() {
        return Err(CouponError::EmptyCode);
    }
    if let Some(applied) = current {
        return Err(CouponError::AlreadyApplied(applied.code.clone()));
    }

    Coupon::find_active(coupons, input)
        .map(|coupon| AppliedCoupon {
            code: coupon.code.clone(),
            percent: coupon.discount_percent,
        })
        .ok_or(CouponError::Invalid)
}

/// Derived checkout amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub item_count: u32,
    pub subtotal: Price,
    pub discount: Price,
    pub total: Price,
}

impl Totals {
    /// Compute totals for a cart with an optional coupon.
    #[must_use]
    pub fn compute(cart: &Cart, coupon: Option<&AppliedCoupon>) -> Self {
        let subtotal = cart.subtotal();
        let discount = coupon.map_or(Price::ZERO, |c| subtotal.percent(c.percent));

        Self {
            item_count: cart.item_count(),
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// Why customer details were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in your name and address")]
pub struct CustomerError;

/// Delivery details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    address: String,
}

impl Customer {
    /// Validate and trim the checkout form fields.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError` if either field is blank.
    pub fn new(name: &str, address: &str) -> Result<Self, CustomerError> {
        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || address.is_empty() {
            return Err(CustomerError);
        }
        Ok(Self {
            name: name.to_owned(),
            address: address.to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Human-readable order summary sent over the chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage(String);

impl OrderMessage {
    /// Build the itemized order text.
    #[must_use]
    pub fn compose(customer: &Customer, cart: &Cart, coupon: Option<&AppliedCoupon>) -> Self {
        let totals = Totals::compute(cart, coupon);
        let items = cart
            .items()
            .iter()
            .map(|item| {
                format!(
                    "• {}x {} ({})",
                    item.quantity,
                    item.product.name,
                    item.line_total()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut message = format!("*🛍️ NEW ORDER from {SHOP_NAME}*\n\n");
        // Writing to a String cannot fail.
        let _ = writeln!(message, "*Customer:* {}", customer.name());
        let _ = writeln!(message, "*Address:* {}\n", customer.address());
        let _ = writeln!(message, "*📦 Order Details:*\n{items}\n");

        if let Some(applied) = coupon {
            let _ = writeln!(
                message,
                "*Coupon:* {} (-{}%)",
                applied.code,
                applied.percent_label()
            );
            let _ = writeln!(message, "*Subtotal:* {}", totals.subtotal);
            let _ = writeln!(message, "*Discount:* {}", totals.discount);
        }

        let _ = writeln!(message, "*Total:* {}\n", totals.total);
        message.push_str("Thank you! 🎂");

        Self(message)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CouponId, Product, ProductId};

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Price::from_rupees(price),
            sale_price: None,
            category: "Cakes & Pastries".to_owned(),
            image: String::new(),
            is_best_seller: false,
            display_order: None,
        }
    }

    fn coupons() -> Vec<Coupon> {
        vec![
            Coupon {
                id: CouponId::new("1"),
                code: "SAVE20".to_owned(),
                discount_percent: Decimal::from(20),
                active: true,
            },
            Coupon {
                id: CouponId::new("2"),
                code: "OLD50".to_owned(),
                discount_percent: Decimal::from(50),
                active: false,
            },
        ]
    }

    fn cart_worth_1000() -> Cart {
        let mut cart = Cart::default();
        let cake = product("p1", "Molten Lava", 500);
        cart.add(&cake);
        cart.add(&cake);
        cart
    }

    #[test]
    fn test_save20_on_1000() {
        let cart = cart_worth_1000();
        let applied = apply_coupon("save20", &coupons(), None);
        assert!(applied.is_ok());

        let totals = Totals::compute(&cart, applied.as_ref().ok());
        assert_eq!(totals.subtotal, Price::from_rupees(1000));
        assert_eq!(totals.discount, Price::from_rupees(200));
        assert_eq!(totals.total, Price::from_rupees(800));
    }

    #[test]
    fn test_inactive_or_unknown_code_leaves_total() {
        let cart = cart_worth_1000();

        for code in ["OLD50", "NOPE"] {
            let applied = apply_coupon(code, &coupons(), None);
            assert_eq!(applied, Err(CouponError::Invalid));
            let totals = Totals::compute(&cart, applied.as_ref().ok());
            assert_eq!(totals.total, Price::from_rupees(1000));
        }
    }

    #[test]
    fn test_empty_code_rejected() {
        assert_eq!(apply_coupon("   ", &coupons(), None), Err(CouponError::EmptyCode));
    }

    #[test]
    fn test_second_coupon_requires_clearing_first() {
        let applied = AppliedCoupon {
            code: "SAVE20".to_owned(),
            percent: Decimal::from(20),
        };
        assert_eq!(
            apply_coupon("SAVE20", &coupons(), Some(&applied)),
            Err(CouponError::AlreadyApplied("SAVE20".to_owned()))
        );
    }

    #[test]
    fn test_customer_requires_name_and_address() {
        assert_eq!(Customer::new(" ", "Johar Town"), Err(CustomerError));
        assert_eq!(Customer::new("Ayesha", ""), Err(CustomerError));
        let customer = Customer::new(" Ayesha ", " Johar Town ").ok();
        assert_eq!(customer.as_ref().map(Customer::name), Some("Ayesha"));
        assert_eq!(customer.as_ref().map(Customer::address), Some("Johar Town"));
    }

    #[test]
    fn test_order_message_without_coupon() {
        let cart = cart_worth_1000();
        let customer = Customer::new("Ayesha", "Johar Town").ok();
        let message = customer.map(|c| OrderMessage::compose(&c, &cart, None));
        let text = message.as_ref().map(OrderMessage::as_str).unwrap_or_default();

        assert!(text.contains("*Customer:* Ayesha"));
        assert!(text.contains("*Address:* Johar Town"));
        assert!(text.contains("• 2x Molten Lava (Rs. 1000)"));
        assert!(text.contains("*Total:* Rs. 1000"));
        assert!(!text.contains("*Coupon:*"));
    }

    #[test]
    fn test_order_message_with_coupon() {
        let cart = cart_worth_1000();
        let applied = apply_coupon("SAVE20", &coupons(), None).ok();
        let customer = Customer::new("Ayesha", "Johar Town").ok();
        let message = customer.map(|c| OrderMessage::compose(&c, &cart, applied.as_ref()));
        let text = message.as_ref().map(OrderMessage::as_str).unwrap_or_default();

        assert!(text.contains("*Coupon:* SAVE20 (-20%)"));
        assert!(text.contains("*Subtotal:* Rs. 1000"));
        assert!(text.contains("*Discount:* Rs. 200"));
        assert!(text.contains("*Total:* Rs. 800"));
        assert!(text.ends_with("Thank you! 🎂"));
    }
}
