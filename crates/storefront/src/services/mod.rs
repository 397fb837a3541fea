//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Shared catalog snapshot, refresh, and counters
//! - `admin` - Per-session admin drafts and saving
//! - `auth` - Admin password verification
//! - `checkout` - Chat deep link for orders

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod checkout;
