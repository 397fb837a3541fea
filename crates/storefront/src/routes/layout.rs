//! View data shared by the shop pages.
//!
//! Every page renders the same chrome: announcement bar, navigation, cart
//! drawer, and the add-to-cart notification. Admin-area pages hide all of it.

use chrono::{DateTime, Utc};

use mousse_melts_core::{CartItem, Product, Route};

use crate::models::ShopperSession;
use crate::services::catalog::CatalogSnapshot;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: String,
    /// Price actually charged.
    pub price: String,
    /// Base price, struck through when a sale price applies.
    pub original_price: Option<String>,
    pub is_best_seller: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.line_price().to_string(),
            original_price: product.is_on_sale().then(|| product.price.to_string()),
            is_best_seller: product.is_best_seller,
        }
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub original_price: Option<String>,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        let card = ProductCard::from(&item.product);
        Self {
            id: card.id,
            name: card.name,
            image: card.image,
            quantity: item.quantity,
            unit_price: card.price,
            original_price: card.original_price,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Announcement bar contents.
#[derive(Clone)]
pub struct AnnouncementView {
    pub text: String,
    pub marquee: bool,
}

/// Add-to-cart notification contents.
#[derive(Clone)]
pub struct NotificationView {
    pub name: String,
    pub image: String,
    pub price: String,
    /// Remaining display time as a percentage.
    pub progress: u8,
}

/// Shared page chrome.
#[derive(Clone)]
pub struct ShopChrome {
    /// Navigation, announcement, drawer, and notification are shown.
    pub show_nav: bool,
    /// Path forms send back as `return_to`.
    pub current_path: String,
    pub announcement: Option<AnnouncementView>,
    pub cart_count: u32,
    pub cart_open: bool,
    pub drawer: Vec<CartLineView>,
    pub subtotal: String,
    pub notification: Option<NotificationView>,
}

impl ShopChrome {
    /// Build the chrome for `route` from the catalog and the visitor's state.
    #[must_use]
    pub fn new(
        route: Route,
        snapshot: &CatalogSnapshot,
        shopper: &ShopperSession,
        now: DateTime<Utc>,
    ) -> Self {
        let show_nav = !route.is_admin_area();
        let announcement = &snapshot.settings.announcement;

        Self {
            show_nav,
            current_path: route.path().to_string(),
            announcement: (show_nav && announcement.active && !announcement.text.trim().is_empty())
                .then(|| AnnouncementView {
                    text: announcement.text.clone(),
                    marquee: announcement.is_marquee,
                }),
            cart_count: shopper.cart.item_count(),
            cart_open: show_nav && shopper.cart_open,
            drawer: shopper.cart.items().iter().map(CartLineView::from).collect(),
            subtotal: shopper.cart.subtotal().to_string(),
            notification: shopper
                .notification(now)
                .filter(|_| show_nav)
                .map(|(added, progress)| NotificationView {
                    name: added.product.name.clone(),
                    image: added.product.image.clone(),
                    price: added.product.line_price().to_string(),
                    progress,
                }),
        }
    }

    /// Chrome for admin-area pages, which show none of the shop elements.
    #[must_use]
    pub fn admin_area(route: Route) -> Self {
        Self {
            show_nav: false,
            current_path: route.path().to_string(),
            announcement: None,
            cart_count: 0,
            cart_open: false,
            drawer: Vec::new(),
            subtotal: String::new(),
            notification: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use mousse_melts_core::catalog::fallback_products;

    use super::*;

    fn shopper_with_oreo(now: DateTime<Utc>) -> ShopperSession {
        let mut shopper = ShopperSession::default();
        for product in fallback_products().iter().take(1) {
            shopper.add_to_cart(product, now);
        }
        shopper.cart_open = true;
        shopper
    }

    #[test]
    fn test_product_card_shows_sale_price() {
        let products = fallback_products();
        let cards: Vec<ProductCard> = products.iter().map(ProductCard::from).collect();

        let oreo = cards.iter().find(|card| card.id == "c1");
        assert_eq!(oreo.map(|c| c.price.as_str()), Some("Rs. 200"));
        assert_eq!(
            oreo.and_then(|c| c.original_price.as_deref()),
            Some("Rs. 250")
        );

        let velvet = cards.iter().find(|card| card.id == "c2");
        assert_eq!(velvet.and_then(|c| c.original_price.clone()), None);
    }

    #[test]
    fn test_shop_chrome_for_home() {
        let now = Utc::now();
        let shopper = shopper_with_oreo(now);
        let chrome = ShopChrome::new(Route::Home, &CatalogSnapshot::default(), &shopper, now);

        assert!(chrome.show_nav);
        assert!(chrome.cart_open);
        assert_eq!(chrome.cart_count, 1);
        assert_eq!(chrome.subtotal, "Rs. 200");
        assert!(chrome.announcement.is_some());
        assert_eq!(chrome.notification.map(|n| n.progress), Some(100));
    }

    #[test]
    fn test_notification_hidden_after_expiry() {
        let now = Utc::now();
        let shopper = shopper_with_oreo(now);
        let later = now + TimeDelta::seconds(5);
        let chrome = ShopChrome::new(Route::Cart, &CatalogSnapshot::default(), &shopper, later);
        assert!(chrome.notification.is_none());
    }

    #[test]
    fn test_admin_routes_hide_shop_chrome() {
        let now = Utc::now();
        let shopper = shopper_with_oreo(now);
        let chrome = ShopChrome::new(Route::Login, &CatalogSnapshot::default(), &shopper, now);

        assert!(!chrome.show_nav);
        assert!(!chrome.cart_open);
        assert!(chrome.announcement.is_none());
        assert!(chrome.notification.is_none());
    }
}
