//! Domain models for storefront.

pub mod session;

pub use session::{CurrentAdmin, ShopperSession, keys as session_keys};
