//! Timing for transient UI indicators.
//!
//! The add-to-cart notification and the admin "saved" badge both disappear on
//! their own after a fixed time. The server derives their visibility from the
//! moment they were raised instead of running a timer.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// How long the add-to-cart notification stays up.
pub const CART_NOTIFICATION_DURATION: TimeDelta = TimeDelta::seconds(4);

/// How long the admin save indicator stays up.
pub const SAVE_INDICATOR_DURATION: TimeDelta = TimeDelta::seconds(3);

/// The product most recently added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAdded {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

impl LastAdded {
    #[must_use]
    pub const fn new(product: Product, added_at: DateTime<Utc>) -> Self {
        Self { product, added_at }
    }

    /// Remaining progress as a percentage, counting down from 100.
    ///
    /// Returns `None` once the notification has run its full duration.
    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> Option<u8> {
        remaining_percent(self.added_at, now, CART_NOTIFICATION_DURATION)
    }

    /// Whether the notification has dismissed itself.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.progress(now).is_none()
    }
}

/// Whether an indicator raised at `since` is still visible at `now`.
#[must_use]
pub fn is_visible(since: DateTime<Utc>, now: DateTime<Utc>, duration: TimeDelta) -> bool {
    remaining_percent(since, now, duration).is_some()
}

fn remaining_percent(since: DateTime<Utc>, now: DateTime<Utc>, duration: TimeDelta) -> Option<u8> {
    let total = duration.num_milliseconds();
    let elapsed = (now - since).num_milliseconds().max(0);
    if total <= 0 || elapsed >= total {
        return None;
    }

    let remaining = (total - elapsed) * 100 / total;
    u8::try_from(remaining).ok()
}
