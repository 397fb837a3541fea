//! Client route resolution.
//!
//! The storefront has a fixed set of pages. Any other path resolves to the
//! home page, so stale links and `return_to` values never dead-end.

/// A page of the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Login,
    Admin,
    Cart,
    Checkout,
    OurStory,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::OurStory,
        Self::Cart,
        Self::Checkout,
        Self::Login,
        Self::Admin,
    ];

    /// Resolve a request path.
    ///
    /// Query strings, fragments, and a trailing slash are ignored. Unknown
    /// paths resolve to [`Route::Home`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or_default()
    }

    /// Canonical path for this route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Admin => "/admin",
            Self::Cart => "/cart",
            Self::Checkout => "/checkout",
            Self::OurStory => "/our-story",
        }
    }

    /// Admin-area pages hide the shop navigation and cart notification.
    #[must_use]
    pub const fn is_admin_area(self) -> bool {
        matches!(self, Self::Login | Self::Admin)
    }
}
