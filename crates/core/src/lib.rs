//! Mousse & Melts Core - Shared domain library.
//!
//! This crate holds the domain model and the pure bookkeeping used by the
//! storefront binary and the CLI:
//! - `storefront` - Public shop, checkout, and admin panel
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Everything here can be unit tested directly.
//!
//! # Modules
//!
//! - [`types`] - Products, coupons, settings, stats, prices, and IDs
//! - [`cart`] - Cart lines and quantity rules
//! - [`checkout`] - Coupon application, totals, and order message text
//! - [`catalog`] - Display ordering, category filtering, and fallback data
//! - [`route`] - Client route resolution
//! - [`notification`] - Timing for transient UI indicators

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notification;
pub mod route;
pub mod types;

pub use cart::{Cart, CartItem, QuantityError};
pub use checkout::{AppliedCoupon, CouponError, Customer, CustomerError, OrderMessage, Totals};
pub use notification::LastAdded;
pub use route::Route;
pub use types::*;
