//! JSON API route handlers.

pub mod admin;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Build the admin draft API router, nested under `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/draft", get(admin::draft))
        .route("/products", post(admin::add_product))
        .route("/products/reorder", post(admin::reorder_products))
        .route(
            "/products/{id}",
            patch(admin::update_product).delete(admin::delete_product),
        )
        .route("/settings/hero", patch(admin::update_hero))
        .route("/settings/announcement", patch(admin::update_announcement))
        .route("/coupons", post(admin::add_coupon))
        .route(
            "/coupons/{id}",
            patch(admin::update_coupon).delete(admin::delete_coupon),
        )
        .route("/save", post(admin::save))
}
