//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use mousse_melts_core::catalog::{filter_by_category, find};
use mousse_melts_core::{CATEGORIES, CategoryFilter, HeroConfig, Route};

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::routes::layout::{ProductCard, ShopChrome};
use crate::state::AppState;

/// Accent shown when the hero title has no second part.
const DEFAULT_TITLE_ACCENT: &str = "Elevated.";

/// Hero section display data.
#[derive(Clone)]
pub struct HeroView {
    pub title_lead: String,
    pub title_accent: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
}

impl From<&HeroConfig> for HeroView {
    fn from(hero: &HeroConfig) -> Self {
        let (lead, accent) = hero.title_parts();
        let accent = match accent.trim() {
            "" => DEFAULT_TITLE_ACCENT,
            accent => accent,
        };
        Self {
            title_lead: lead.trim().to_string(),
            title_accent: accent.to_string(),
            subtitle: hero.subtitle.clone(),
            price: hero.price.to_string(),
            image: hero.image.clone(),
        }
    }
}

/// Category filter button.
#[derive(Clone)]
pub struct CategoryLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Build the filter bar, `All` first.
fn category_links(selected: &CategoryFilter) -> Vec<CategoryLink> {
    std::iter::once(CategoryFilter::All)
        .chain(
            CATEGORIES
                .iter()
                .map(|name| CategoryFilter::Named((*name).to_string())),
        )
        .map(|filter| CategoryLink {
            label: filter.label().to_string(),
            href: match &filter {
                CategoryFilter::All => "/#menu".to_string(),
                CategoryFilter::Named(name) => {
                    format!("/?category={}#menu", urlencoding::encode(name))
                }
            },
            active: filter == *selected,
        })
        .collect()
}

/// Home page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: ShopChrome,
    /// The first catalog load has not finished.
    pub loading: bool,
    pub hero: HeroView,
    pub categories: Vec<CategoryLink>,
    pub products: Vec<ProductCard>,
    /// Chat link for an order placed just before landing here.
    pub chat_handoff: Option<String>,
}

/// Render the home page.
pub(crate) async fn render_home(
    state: &AppState,
    shopper: &Shopper,
    filter: &CategoryFilter,
) -> HomeTemplate {
    let snapshot = state.catalog().snapshot().await;

    HomeTemplate {
        chrome: ShopChrome::new(Route::Home, &snapshot, shopper, Utc::now()),
        loading: state.catalog().is_loading(),
        hero: HeroView::from(&snapshot.settings.hero),
        categories: category_links(filter),
        products: filter_by_category(&snapshot.products, filter)
            .into_iter()
            .map(ProductCard::from)
            .collect(),
        chat_handoff: None,
    }
}

/// Display the home page.
///
/// A chat link left by checkout is handed off here exactly once.
#[instrument(skip(state, shopper))]
pub async fn home(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse> {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let chat_handoff = shopper.take_chat_handoff();
    if chat_handoff.is_some() {
        shopper.save().await?;
    }

    Ok(HomeTemplate {
        chat_handoff,
        ..render_home(&state, &shopper, &filter).await
    })
}

/// Hero call to action.
///
/// Adds the hero's linked product to the cart when it exists in the catalog;
/// otherwise jumps to the menu.
#[instrument(skip(state, shopper))]
pub async fn hero_action(State(state): State<AppState>, mut shopper: Shopper) -> Result<Response> {
    let snapshot = state.catalog().snapshot().await;

    let linked = snapshot
        .settings
        .hero
        .linked_product()
        .and_then(|id| find(&snapshot.products, id));

    let Some(product) = linked else {
        return Ok(Redirect::to("/#menu").into_response());
    };

    shopper.add_to_cart(product, Utc::now());
    shopper.save().await?;

    Ok(super::navigate(Route::Home).into_response())
}

#[cfg(test)]
mod tests {
    use mousse_melts_core::Price;

    use super::*;

    #[test]
    fn test_hero_title_split() {
        let hero = HeroConfig {
            title: "Sweetness, Elevated.".to_string(),
            subtitle: String::new(),
            price: Price::from_rupees(250),
            image: String::new(),
            linked_product_id: None,
        };
        let view = HeroView::from(&hero);
        assert_eq!(view.title_lead, "Sweetness");
        assert_eq!(view.title_accent, "Elevated.");
        assert_eq!(view.price, "Rs. 250");
    }

    #[test]
    fn test_hero_title_without_comma_gets_default_accent() {
        let hero = HeroConfig {
            title: "Fresh Bakes".to_string(),
            subtitle: String::new(),
            price: Price::ZERO,
            image: String::new(),
            linked_product_id: None,
        };
        let view = HeroView::from(&hero);
        assert_eq!(view.title_lead, "Fresh Bakes");
        assert_eq!(view.title_accent, DEFAULT_TITLE_ACCENT);
    }

    #[test]
    fn test_category_links_mark_selection() {
        let links = category_links(&CategoryFilter::parse(Some("Cakes & Pastries")));
        assert_eq!(links.len(), CATEGORIES.len() + 1);
        assert_eq!(links.first().map(|l| l.label.as_str()), Some("All"));

        let active: Vec<&str> = links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.href.as_str())
            .collect();
        assert_eq!(active, vec!["/?category=Cakes%20%26%20Pastries#menu"]);
    }
}
