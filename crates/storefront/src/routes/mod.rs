//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Shop
//! GET  /                            - Home (hero, menu, ?category= filter)
//! GET  /our-story                   - Story page
//! POST /hero/action                 - Add the hero's linked product, else jump to the menu
//!
//! # Cart
//! GET  /cart                        - Cart page with recommendations
//! POST /cart/add                    - Add one unit
//! POST /cart/update                 - Change a quantity by a delta
//! POST /cart/remove                 - Remove a line
//! POST /cart/toggle                 - Open/close the cart drawer
//! POST /cart/notification/dismiss   - Close the add-to-cart notification
//!
//! # Checkout
//! GET  /checkout                    - Checkout form
//! POST /checkout                    - Send the order to chat
//! POST /checkout/coupon             - Apply a coupon
//! POST /checkout/coupon/remove      - Remove the applied coupon
//!
//! # Admin
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! POST /logout                      - Logout action
//! GET  /admin                       - Dashboard (requires auth)
//! /api/admin/*                      - Draft editing API (requires auth)
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod layout;
pub mod pages;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use mousse_melts_core::Route;

use crate::state::AppState;

/// Redirect to a storefront page.
#[must_use]
pub fn navigate(route: Route) -> Redirect {
    Redirect::to(route.path())
}

/// Redirect to the page a form was posted from.
///
/// Only storefront paths are honored; anything else lands on the home page.
#[must_use]
pub fn redirect_back(return_to: Option<&str>) -> Redirect {
    navigate(return_to.map_or(Route::Home, Route::from_path))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/toggle", post(cart::toggle))
        .route("/cart/notification/dismiss", post(cart::dismiss_notification))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/checkout/coupon", post(checkout::apply_coupon))
        .route("/checkout/coupon/remove", post(checkout::remove_coupon))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/our-story", get(pages::our_story))
        .route("/hero/action", post(home::hero_action))
        .merge(cart_routes())
        .merge(checkout_routes())
        .merge(auth_routes())
        .route("/admin", get(admin::dashboard))
        .nest("/api/admin", api::admin_routes())
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;

    use super::*;

    fn location(redirect: Redirect) -> String {
        redirect
            .into_response()
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_redirect_back_to_known_page() {
        assert_eq!(location(redirect_back(Some("/cart"))), "/cart");
        assert_eq!(location(redirect_back(Some("/checkout?x=1"))), "/checkout");
    }

    #[test]
    fn test_redirect_back_never_leaves_the_site() {
        assert_eq!(location(redirect_back(Some("https://evil.example"))), "/");
        assert_eq!(location(redirect_back(Some("//evil.example"))), "/");
        assert_eq!(location(redirect_back(None)), "/");
    }
}
