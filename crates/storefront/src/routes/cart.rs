//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every action is a form post that
//! redirects back to the page it came from.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::instrument;

use mousse_melts_core::catalog::{find, not_in_cart};
use mousse_melts_core::{Cart, Product, ProductId, Route};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Shopper;
use crate::routes::layout::{CartLineView, ProductCard, ShopChrome};
use crate::routes::redirect_back;
use crate::state::AppState;

/// Most products suggested under the cart.
const MAX_RECOMMENDATIONS: usize = 4;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i32,
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Cart drawer form data.
#[derive(Debug, Deserialize)]
pub struct ToggleCartForm {
    pub open: Option<bool>,
    pub return_to: Option<String>,
}

/// Form data for actions that only navigate back.
#[derive(Debug, Deserialize)]
pub struct ReturnToForm {
    pub return_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub chrome: ShopChrome,
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub recommendations: Vec<ProductCard>,
}

/// Up to four random products the visitor has not added yet.
fn recommendations(products: &[Product], cart: &Cart) -> Vec<ProductCard> {
    let mut candidates = not_in_cart(products, cart);
    candidates.shuffle(&mut rand::rng());
    candidates
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(ProductCard::from)
        .collect()
}

/// Display cart page.
#[instrument(skip(state, shopper))]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> impl IntoResponse {
    let snapshot = state.catalog().snapshot().await;

    CartTemplate {
        chrome: ShopChrome::new(Route::Cart, &snapshot, &shopper, Utc::now()),
        lines: shopper.cart.items().iter().map(CartLineView::from).collect(),
        item_count: shopper.cart.item_count(),
        subtotal: shopper.cart.subtotal().to_string(),
        recommendations: recommendations(&snapshot.products, &shopper.cart),
    }
}

/// Add one unit of a product to the cart.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, shopper))]
pub async fn add(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let snapshot = state.catalog().snapshot().await;
    let product = find(&snapshot.products, &form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let quantity = shopper.add_to_cart(product, Utc::now());
    shopper.save().await?;
    tracing::debug!(product_id = %form.product_id, quantity, "Added to cart");

    Ok(redirect_back(form.return_to.as_deref()))
}

/// Change a line's quantity.
///
/// Changes that would leave the line empty are ignored; removal is explicit.
#[instrument(skip(shopper))]
pub async fn update(mut shopper: Shopper, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    match shopper.update_quantity(&form.product_id, form.delta) {
        Ok(_) => shopper.save().await?,
        Err(e) => tracing::debug!(error = %e, "Quantity change rejected"),
    }

    Ok(redirect_back(form.return_to.as_deref()))
}

/// Remove a line from the cart.
#[instrument(skip(shopper))]
pub async fn remove(
    mut shopper: Shopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    if shopper.remove_from_cart(&form.product_id) {
        shopper.save().await?;
    }

    Ok(redirect_back(form.return_to.as_deref()))
}

/// Open, close, or flip the cart drawer.
#[instrument(skip(shopper))]
pub async fn toggle(mut shopper: Shopper, Form(form): Form<ToggleCartForm>) -> Result<Redirect> {
    shopper.toggle_cart(form.open);
    shopper.save().await?;

    Ok(redirect_back(form.return_to.as_deref()))
}

/// Close the add-to-cart notification.
#[instrument(skip(shopper))]
pub async fn dismiss_notification(
    mut shopper: Shopper,
    Form(form): Form<ReturnToForm>,
) -> Result<Redirect> {
    shopper.clear_last_added();
    shopper.save().await?;

    Ok(redirect_back(form.return_to.as_deref()))
}
