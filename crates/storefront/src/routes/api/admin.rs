//! Admin draft API handlers.
//!
//! Every edit changes only the admin's session draft. `POST /api/admin/save`
//! persists products, settings, and coupons together.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use mousse_melts_core::{Announcement, Coupon, CouponId, HeroConfig, Product, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::routes::admin::{load_draft, store_draft};
use crate::services::admin::{
    AdminDraft, AnnouncementPatch, CouponPatch, HeroPatch, ProductPatch, save_draft,
};
use crate::state::AppState;

/// Draft plus the save indicator state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    #[serde(flatten)]
    pub draft: AdminDraft,
    /// The "saved" indicator is showing.
    pub show_saved: bool,
}

/// Delete query parameters.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Reorder request body.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

/// Save response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub saved_at: DateTime<Utc>,
}

/// Get the current draft.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn draft(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DraftResponse>> {
    let draft = load_draft(&session, state.catalog()).await?;
    let show_saved = draft.show_saved(Utc::now());
    Ok(Json(DraftResponse { draft, show_saved }))
}

/// Add a new product to the draft.
///
/// Returns the product so the editor can open it.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn add_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<Product>)> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let product = draft.add_product(Utc::now());
    store_draft(&session, &draft).await?;

    tracing::info!(product_id = %product.id, "Draft product added");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Edit fields of a draft product.
///
/// # Errors
///
/// Returns 404 if the product is not in the draft.
#[instrument(skip(_admin, state, session, patch))]
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let product = draft.update_product(&id, patch)?.clone();
    store_draft(&session, &draft).await?;
    Ok(Json(product))
}

/// Remove a product from the draft.
///
/// # Errors
///
/// Returns 400 without `confirm=true` and 404 if the product is not in the draft.
#[instrument(skip(_admin, state, session))]
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Product>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let removed = draft.delete_product(&id, query.confirm)?;
    store_draft(&session, &draft).await?;

    tracing::info!(product_id = %id, "Draft product deleted");
    Ok(Json(removed))
}

/// Move a product and resequence the display order.
///
/// # Errors
///
/// Returns 400 if either index is out of range.
#[instrument(skip(_admin, state, session))]
pub async fn reorder_products(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Vec<Product>>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    draft.reorder_products(request.from, request.to)?;
    store_draft(&session, &draft).await?;
    Ok(Json(draft.products))
}

/// Edit the hero section.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn update_hero(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Json(patch): Json<HeroPatch>,
) -> Result<Json<HeroConfig>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    draft.update_hero(patch);
    store_draft(&session, &draft).await?;
    Ok(Json(draft.settings.hero))
}

/// Edit the announcement bar.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn update_announcement(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Json(patch): Json<AnnouncementPatch>,
) -> Result<Json<Announcement>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    draft.update_announcement(patch);
    store_draft(&session, &draft).await?;
    Ok(Json(draft.settings.announcement))
}

/// Add a coupon to the draft.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn add_coupon(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<Coupon>)> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let coupon = draft.add_coupon(Utc::now());
    store_draft(&session, &draft).await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Edit a draft coupon.
///
/// # Errors
///
/// Returns 404 if the coupon is not in the draft.
#[instrument(skip(_admin, state, session, patch))]
pub async fn update_coupon(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CouponId>,
    Json(patch): Json<CouponPatch>,
) -> Result<Json<Coupon>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let coupon = draft.update_coupon(&id, patch)?.clone();
    store_draft(&session, &draft).await?;
    Ok(Json(coupon))
}

/// Remove a coupon from the draft.
///
/// # Errors
///
/// Returns 404 if the coupon is not in the draft.
#[instrument(skip(_admin, state, session))]
pub async fn delete_coupon(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CouponId>,
) -> Result<Json<Coupon>> {
    let mut draft = load_draft(&session, state.catalog()).await?;
    let removed = draft.delete_coupon(&id)?;
    store_draft(&session, &draft).await?;
    Ok(Json(removed))
}

/// Persist the draft.
///
/// On failure the draft stays in the session for another attempt. On
/// success the catalog is refreshed and the draft re-seeded from it.
///
/// # Errors
///
/// Returns `AppError::SaveFailed` if any collection could not be written.
#[instrument(skip_all, fields(username = %admin.username))]
pub async fn save(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SaveResponse>> {
    let draft = load_draft(&session, state.catalog()).await?;
    let catalog = state.catalog();

    save_draft(catalog.repository(), &draft)
        .await
        .map_err(AppError::SaveFailed)?;

    if catalog.refresh().await.is_err() {
        catalog
            .apply_saved(draft.products, draft.settings, draft.coupons)
            .await;
    }

    let saved_at = Utc::now();
    let snapshot = catalog.snapshot().await;
    let mut fresh = AdminDraft::seed(&snapshot);
    fresh.saved_at = Some(saved_at);
    store_draft(&session, &fresh).await?;

    add_breadcrumb("admin", "Catalog saved", None);
    tracing::info!("Catalog saved");
    Ok(Json(SaveResponse { saved_at }))
}
