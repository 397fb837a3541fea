//! Percentage discount coupons.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CouponId;

/// A discount coupon managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    /// Code typed by shoppers. Matched case-insensitively.
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub active: bool,
}

impl Coupon {
    /// Whether shopper input names this coupon. Input is trimmed first.
    #[must_use]
    pub fn matches_code(&self, input: &str) -> bool {
        self.code.to_lowercase() == input.trim().to_lowercase()
    }

    /// Find the first active coupon matching the shopper's input.
    #[must_use]
    pub fn find_active<'a>(coupons: &'a [Self], input: &str) -> Option<&'a Self> {
        coupons
            .iter()
            .find(|coupon| coupon.active && coupon.matches_code(input))
    }
}
