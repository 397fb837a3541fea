//! Admin drafts: edit the catalog locally, then save everything at once.
//!
//! Each admin session holds its own draft copy of products, settings, and
//! coupons. Edits only touch the draft; `save_draft` writes all three
//! collections concurrently. A failed save leaves the draft as it was so the
//! admin can retry.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::instrument;

use mousse_melts_core::catalog::{ReorderError, next_display_order, reorder};
use mousse_melts_core::notification::{SAVE_INDICATOR_DURATION, is_visible};
use mousse_melts_core::{AppSettings, Coupon, CouponId, Price, Product, ProductId};

use crate::db::{CatalogRepository, RepositoryError};
use crate::services::catalog::CatalogSnapshot;

/// Host that marks an image URL as a drive share link.
const DRIVE_HOST: &str = "drive.google.com";

static DRIVE_FILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/d/([a-zA-Z0-9_-]+)").expect("Invalid regex"));
static DRIVE_ID_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("Invalid regex"));

/// Rewrite a drive share link to a directly embeddable image URL.
///
/// URLs that are not drive links, or drive links without a recognizable file
/// ID, are returned unchanged.
#[must_use]
pub fn normalize_image_url(url: &str) -> String {
    if !url.contains(DRIVE_HOST) {
        return url.to_string();
    }

    DRIVE_FILE_PATH_RE
        .captures(url)
        .or_else(|| DRIVE_ID_PARAM_RE.captures(url))
        .and_then(|captures| captures.get(1))
        .map_or_else(
            || url.to_string(),
            |id| format!("https://lh3.googleusercontent.com/d/{}", id.as_str()),
        )
}

/// Rejected draft edit.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("coupon {0} not found")]
    CouponNotFound(CouponId),

    #[error("deletion must be confirmed")]
    ConfirmationRequired,

    #[error(transparent)]
    Reorder(#[from] ReorderError),
}

/// Distinguish a missing field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Field-level product edit. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    /// `null` clears the sale price.
    #[serde(default, deserialize_with = "double_option")]
    pub sale_price: Option<Option<Price>>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub is_best_seller: Option<bool>,
}

/// Field-level hero edit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    /// `null` unlinks the hero from any product.
    #[serde(default, deserialize_with = "double_option")]
    pub linked_product_id: Option<Option<ProductId>>,
}

/// Field-level announcement edit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnnouncementPatch {
    pub text: Option<String>,
    pub active: Option<bool>,
    pub is_marquee: Option<bool>,
}

/// Field-level coupon edit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CouponPatch {
    pub code: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percent: Option<Decimal>,
    pub active: Option<bool>,
}

/// An admin's unsaved copy of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDraft {
    pub products: Vec<Product>,
    pub settings: AppSettings,
    pub coupons: Vec<Coupon>,
    /// Snapshot revision this draft was seeded from.
    pub revision: String,
    /// When the last successful save finished.
    pub saved_at: Option<DateTime<Utc>>,
}

impl AdminDraft {
    /// Copy the editable parts of a catalog snapshot.
    #[must_use]
    pub fn seed(snapshot: &CatalogSnapshot) -> Self {
        Self {
            products: snapshot.products.clone(),
            settings: snapshot.settings.clone(),
            coupons: snapshot.coupons.clone(),
            revision: snapshot.revision.clone(),
            saved_at: None,
        }
    }

    /// Whether the catalog changed since this draft was seeded.
    #[must_use]
    pub fn is_stale(&self, snapshot: &CatalogSnapshot) -> bool {
        self.revision != snapshot.revision
    }

    /// Whether the "saved" indicator is still showing.
    #[must_use]
    pub fn show_saved(&self, now: DateTime<Utc>) -> bool {
        self.saved_at
            .is_some_and(|saved| is_visible(saved, now, SAVE_INDICATOR_DURATION))
    }

    /// Apply a field edit to one product.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::ProductNotFound` if no draft product has this ID.
    pub fn update_product(
        &mut self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<&Product, DraftError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == *id)
            .ok_or_else(|| DraftError::ProductNotFound(id.clone()))?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(sale_price) = patch.sale_price {
            product.sale_price = sale_price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(image) = patch.image {
            product.image = normalize_image_url(&image);
        }
        if let Some(is_best_seller) = patch.is_best_seller {
            product.is_best_seller = is_best_seller;
        }

        Ok(product)
    }

    /// Append a blank product and return a copy of it.
    pub fn add_product(&mut self, now: DateTime<Utc>) -> Product {
        let mut id = ProductId::from_timestamp(now);
        let mut suffix = 0_u32;
        while self.products.iter().any(|product| product.id == id) {
            suffix += 1;
            id = ProductId::new(format!("{}-{suffix}", ProductId::from_timestamp(now)));
        }

        let product = Product {
            id,
            name: "New Product".to_string(),
            description: String::new(),
            price: Price::ZERO,
            sale_price: None,
            category: "Cupcakes".to_string(),
            image: String::new(),
            is_best_seller: false,
            display_order: Some(next_display_order(&self.products)),
        };
        self.products.push(product.clone());
        product
    }

    /// Remove a product from the draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::ConfirmationRequired` unless `confirmed`, and
    /// `DraftError::ProductNotFound` if no draft product has this ID.
    pub fn delete_product(
        &mut self,
        id: &ProductId,
        confirmed: bool,
    ) -> Result<Product, DraftError> {
        if !confirmed {
            return Err(DraftError::ConfirmationRequired);
        }
        let index = self
            .products
            .iter()
            .position(|product| product.id == *id)
            .ok_or_else(|| DraftError::ProductNotFound(id.clone()))?;
        Ok(self.products.remove(index))
    }

    /// Move a product and renumber the display order.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::Reorder` if either index is out of range.
    pub fn reorder_products(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        reorder(&mut self.products, from, to)?;
        Ok(())
    }

    /// Apply a field edit to the hero section.
    pub fn update_hero(&mut self, patch: HeroPatch) {
        let hero = &mut self.settings.hero;
        if let Some(title) = patch.title {
            hero.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            hero.subtitle = subtitle;
        }
        if let Some(price) = patch.price {
            hero.price = price;
        }
        if let Some(image) = patch.image {
            hero.image = normalize_image_url(&image);
        }
        if let Some(linked) = patch.linked_product_id {
            hero.linked_product_id = linked.filter(|id| !id.is_empty());
        }
    }

    /// Apply a field edit to the announcement banner.
    pub fn update_announcement(&mut self, patch: AnnouncementPatch) {
        let announcement = &mut self.settings.announcement;
        if let Some(text) = patch.text {
            announcement.text = text;
        }
        if let Some(active) = patch.active {
            announcement.active = active;
        }
        if let Some(is_marquee) = patch.is_marquee {
            announcement.is_marquee = is_marquee;
        }
    }

    /// Append a starter coupon and return a copy of it.
    pub fn add_coupon(&mut self, now: DateTime<Utc>) -> Coupon {
        let mut id = CouponId::from_timestamp(now);
        let mut suffix = 0_u32;
        while self.coupons.iter().any(|coupon| coupon.id == id) {
            suffix += 1;
            id = CouponId::new(format!("{}-{suffix}", CouponId::from_timestamp(now)));
        }

        let coupon = Coupon {
            id,
            code: "NEW20".to_string(),
            discount_percent: Decimal::from(20),
            active: true,
        };
        self.coupons.push(coupon.clone());
        coupon
    }

    /// Apply a field edit to one coupon.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::CouponNotFound` if no draft coupon has this ID.
    pub fn update_coupon(
        &mut self,
        id: &CouponId,
        patch: CouponPatch,
    ) -> Result<&Coupon, DraftError> {
        let coupon = self
            .coupons
            .iter_mut()
            .find(|coupon| coupon.id == *id)
            .ok_or_else(|| DraftError::CouponNotFound(id.clone()))?;

        if let Some(code) = patch.code {
            coupon.code = code;
        }
        if let Some(percent) = patch.discount_percent {
            coupon.discount_percent = percent;
        }
        if let Some(active) = patch.active {
            coupon.active = active;
        }
        Ok(coupon)
    }

    /// Remove a coupon from the draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::CouponNotFound` if no draft coupon has this ID.
    pub fn delete_coupon(&mut self, id: &CouponId) -> Result<Coupon, DraftError> {
        let index = self
            .coupons
            .iter()
            .position(|coupon| coupon.id == *id)
            .ok_or_else(|| DraftError::CouponNotFound(id.clone()))?;
        Ok(self.coupons.remove(index))
    }
}

/// Persist all three draft collections concurrently.
///
/// # Errors
///
/// Returns the first `RepositoryError`; the draft itself is never modified.
#[instrument(skip_all, fields(products = draft.products.len(), coupons = draft.coupons.len()))]
pub async fn save_draft(
    repository: &CatalogRepository,
    draft: &AdminDraft,
) -> Result<(), RepositoryError> {
    tokio::try_join!(
        repository.save_products(&draft.products),
        repository.save_settings(&draft.settings),
        repository.save_coupons(&draft.coupons),
    )?;
    Ok(())
}
