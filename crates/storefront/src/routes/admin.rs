//! Admin dashboard route handler and draft session helpers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use mousse_melts_core::{CATEGORIES, Coupon, Product, Route, Stats};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::session_keys;
use crate::routes::layout::ShopChrome;
use crate::services::admin::AdminDraft;
use crate::services::catalog::CatalogState;
use crate::state::AppState;

/// Load the admin's draft.
///
/// A missing, unreadable, or stale draft is replaced by a fresh copy of the
/// catalog snapshot.
pub(crate) async fn load_draft(session: &Session, catalog: &CatalogState) -> Result<AdminDraft> {
    let snapshot = catalog.snapshot().await;
    let stored = session
        .get::<AdminDraft>(session_keys::ADMIN_DRAFT)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable admin draft");
            None
        });

    match stored {
        Some(draft) if !draft.is_stale(&snapshot) => Ok(draft),
        _ => {
            let draft = AdminDraft::seed(&snapshot);
            store_draft(session, &draft).await?;
            Ok(draft)
        }
    }
}

/// Write the draft back to the session.
pub(crate) async fn store_draft(session: &Session, draft: &AdminDraft) -> Result<()> {
    session.insert(session_keys::ADMIN_DRAFT, draft).await?;
    Ok(())
}

/// Product row in the admin editor.
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub sale_price: String,
    pub category: String,
    pub image: String,
    pub is_best_seller: bool,
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl ProductRow {
    fn rows(products: &[Product]) -> Vec<Self> {
        let last = products.len().saturating_sub(1);
        products
            .iter()
            .enumerate()
            .map(|(index, product)| Self {
                id: product.id.to_string(),
                name: product.name.clone(),
                description: product.description.clone(),
                price: product.price.amount().normalize().to_string(),
                sale_price: product
                    .sale_price
                    .map(|sale| sale.amount().normalize().to_string())
                    .unwrap_or_default(),
                category: product.category.clone(),
                image: product.image.clone(),
                is_best_seller: product.is_best_seller,
                index,
                is_first: index == 0,
                is_last: index == last,
            })
            .collect()
    }

    /// Whether `category` is this product's category.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Coupon row in the admin editor.
pub struct CouponRow {
    pub id: String,
    pub code: String,
    pub discount_percent: String,
    pub active: bool,
}

impl From<&Coupon> for CouponRow {
    fn from(coupon: &Coupon) -> Self {
        Self {
            id: coupon.id.to_string(),
            code: coupon.code.clone(),
            discount_percent: coupon.discount_percent.normalize().to_string(),
            active: coupon.active,
        }
    }
}

/// Hero editor fields.
pub struct HeroForm {
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
    pub linked_product_id: String,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub chrome: ShopChrome,
    pub username: String,
    pub stats: Stats,
    pub products: Vec<ProductRow>,
    pub categories: &'static [&'static str],
    pub hero: HeroForm,
    pub announcement_text: String,
    pub announcement_active: bool,
    pub announcement_marquee: bool,
    pub coupons: Vec<CouponRow>,
    pub show_saved: bool,
}

/// Display the admin dashboard.
///
/// Refreshes the catalog first so the stats and a re-seeded draft are current.
#[instrument(skip(state, session, admin), fields(username = %admin.username))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    // Failures keep the previous snapshot and are logged by `refresh`.
    let _ = state.catalog().refresh().await;

    let draft = load_draft(&session, state.catalog()).await?;
    let snapshot = state.catalog().snapshot().await;
    let hero = &draft.settings.hero;
    let announcement = &draft.settings.announcement;

    Ok(AdminTemplate {
        chrome: ShopChrome::admin_area(Route::Admin),
        username: admin.username,
        stats: snapshot.stats,
        products: ProductRow::rows(&draft.products),
        categories: &CATEGORIES,
        hero: HeroForm {
            title: hero.title.clone(),
            subtitle: hero.subtitle.clone(),
            price: hero.price.amount().normalize().to_string(),
            image: hero.image.clone(),
            linked_product_id: hero
                .linked_product()
                .map(ToString::to_string)
                .unwrap_or_default(),
        },
        announcement_text: announcement.text.clone(),
        announcement_active: announcement.active,
        announcement_marquee: announcement.is_marquee,
        coupons: draft.coupons.iter().map(CouponRow::from).collect(),
        show_saved: draft.show_saved(Utc::now()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use mousse_melts_core::catalog::fallback_products;

    use super::*;
    use crate::db::{CatalogRepository, MemoryDocumentStore};

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn catalog() -> CatalogState {
        CatalogState::new(CatalogRepository::new(Arc::new(MemoryDocumentStore::new())))
    }

    #[tokio::test]
    async fn test_load_draft_seeds_and_keeps_edits() {
        let session = session();
        let catalog = catalog();

        let mut draft = load_draft(&session, &catalog).await.unwrap();
        assert_eq!(draft.products, fallback_products());

        draft.add_product(Utc::now());
        store_draft(&session, &draft).await.unwrap();

        let reloaded = load_draft(&session, &catalog).await.unwrap();
        assert_eq!(reloaded.products.len(), 3);
    }

    #[tokio::test]
    async fn test_stale_draft_is_reseeded() {
        let session = session();
        let catalog = catalog();

        let mut draft = load_draft(&session, &catalog).await.unwrap();
        draft.add_product(Utc::now());
        store_draft(&session, &draft).await.unwrap();

        // Another admin saves a different catalog.
        catalog
            .repository()
            .save_products(&fallback_products()[..1])
            .await
            .unwrap();
        catalog.refresh().await.unwrap();

        let reloaded = load_draft(&session, &catalog).await.unwrap();
        assert_eq!(reloaded.products.len(), 1);
    }

    #[test]
    fn test_product_rows_mark_ends() {
        let rows = ProductRow::rows(&fallback_products());
        assert!(rows.first().is_some_and(|row| row.is_first && !row.is_last));
        assert!(rows.last().is_some_and(|row| row.is_last && row.index == 1));
        assert_eq!(rows.first().map(|row| row.sale_price.as_str()), Some("200"));
    }
}
