//! Checkout route handlers.
//!
//! Checkout collects a name and address, applies at most one coupon, and
//! hands the order to the shop over chat. There is no payment step.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use mousse_melts_core::checkout::apply_coupon as match_coupon;
use mousse_melts_core::{Customer, OrderMessage, Route, Totals};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::routes::layout::{CartLineView, ShopChrome};
use crate::routes::navigate;
use crate::services::catalog::CatalogSnapshot;
use crate::services::checkout::chat_link;
use crate::state::AppState;

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
}

/// Delivery details form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Applied coupon display data.
#[derive(Clone)]
pub struct AppliedCouponView {
    pub code: String,
    pub percent: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub chrome: ShopChrome,
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub discount: Option<String>,
    pub total: String,
    pub applied: Option<AppliedCouponView>,
    pub coupon_code: String,
    pub coupon_error: Option<String>,
    pub name: String,
    pub address: String,
    pub form_error: Option<String>,
}

impl CheckoutTemplate {
    fn new(snapshot: &CatalogSnapshot, shopper: &Shopper) -> Self {
        let totals = Totals::compute(&shopper.cart, shopper.applied_coupon.as_ref());

        Self {
            chrome: ShopChrome::new(Route::Checkout, snapshot, shopper, Utc::now()),
            lines: shopper.cart.items().iter().map(CartLineView::from).collect(),
            item_count: totals.item_count,
            subtotal: totals.subtotal.to_string(),
            discount: shopper
                .applied_coupon
                .as_ref()
                .map(|_| totals.discount.to_string()),
            total: totals.total.to_string(),
            applied: shopper
                .applied_coupon
                .as_ref()
                .map(|applied| AppliedCouponView {
                    code: applied.code.clone(),
                    percent: applied.percent_label(),
                }),
            coupon_code: String::new(),
            coupon_error: None,
            name: String::new(),
            address: String::new(),
            form_error: None,
        }
    }
}

/// Display the checkout page.
#[instrument(skip(state, shopper))]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> impl IntoResponse {
    let snapshot = state.catalog().snapshot().await;
    CheckoutTemplate::new(&snapshot, &shopper)
}

/// Apply a coupon code.
///
/// A rejected code re-renders the page with the reason and the typed code.
#[instrument(skip(state, shopper))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<CouponForm>,
) -> Result<Response> {
    let snapshot = state.catalog().snapshot().await;

    match match_coupon(
        &form.code,
        &snapshot.coupons,
        shopper.applied_coupon.as_ref(),
    ) {
        Ok(applied) => {
            tracing::info!(code = %applied.code, "Coupon applied");
            shopper.applied_coupon = Some(applied);
            shopper.save().await?;
            Ok(navigate(Route::Checkout).into_response())
        }
        Err(e) => {
            let page = CheckoutTemplate {
                coupon_code: form.code,
                coupon_error: Some(e.to_string()),
                ..CheckoutTemplate::new(&snapshot, &shopper)
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Remove the applied coupon.
#[instrument(skip(shopper))]
pub async fn remove_coupon(mut shopper: Shopper) -> Result<Redirect> {
    if shopper.applied_coupon.take().is_some() {
        shopper.save().await?;
    }
    Ok(navigate(Route::Checkout))
}

/// Send the order.
///
/// Records the lead, clears the cart and coupon, and routes the shopper home.
/// The home page then opens the chat link carrying the order message in a new
/// tab. Delivery of the message is not confirmed.
#[instrument(skip(state, shopper, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if shopper.cart.is_empty() {
        return Ok(navigate(Route::Cart).into_response());
    }

    let customer = match Customer::new(&form.name, &form.address) {
        Ok(customer) => customer,
        Err(e) => {
            let snapshot = state.catalog().snapshot().await;
            let page = CheckoutTemplate {
                name: form.name,
                address: form.address,
                form_error: Some(e.to_string()),
                ..CheckoutTemplate::new(&snapshot, &shopper)
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    state.catalog().record_checkout();

    let message = OrderMessage::compose(&customer, &shopper.cart, shopper.applied_coupon.as_ref());
    let item_count = shopper.cart.item_count().to_string();
    add_breadcrumb("checkout", "Order sent to chat", Some(&[("items", item_count.as_str())]));

    shopper.clear_cart();
    shopper.applied_coupon = None;
    shopper.pending_chat = Some(chat_link(&state.config().whatsapp_number, &message));
    shopper.save().await?;

    Ok(navigate(Route::Home).into_response())
}
