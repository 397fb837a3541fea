//! Core types for Mousse & Melts.
//!
//! This module provides the documents stored in the catalog and the
//! type-safe wrappers they are built from.

pub mod coupon;
pub mod id;
pub mod price;
pub mod product;
pub mod settings;
pub mod stats;

pub use coupon::Coupon;
pub use id::*;
pub use price::Price;
pub use product::{CATEGORIES, CategoryFilter, Product};
pub use settings::{Announcement, AppSettings, HeroConfig};
pub use stats::Stats;
