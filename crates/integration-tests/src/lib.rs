//! Integration tests for Mousse & Melts.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mousse-melts-integration-tests
//! ```
//!
//! The full router runs in-process over the in-memory document store and an
//! in-memory session store, so no database is needed.
//!
//! # Test Categories
//!
//! - `shop_flow` - Browsing, cart, and chat checkout
//! - `coupon_flow` - Coupon validation at checkout
//! - `admin_flow` - Login gating, draft editing, and saving

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use mousse_melts_core::Stats;
use mousse_melts_storefront::build_app;
use mousse_melts_storefront::config::{ConfigError, StorefrontConfig};
use mousse_melts_storefront::db::{CatalogRepository, MemoryDocumentStore};
use mousse_melts_storefront::middleware::create_session_layer;
use mousse_melts_storefront::middleware::session::SESSION_COOKIE_NAME;
use mousse_melts_storefront::services::auth::{AuthError, hash_password};
use mousse_melts_storefront::services::catalog::CatalogState;
use mousse_melts_storefront::state::AppState;

/// Admin login used by every test context.
pub const ADMIN_USERNAME: &str = "baker";
pub const ADMIN_PASSWORD: &str = "mousse-n-melts";
pub const WHATSAPP_NUMBER: &str = "923290033863";

/// Errors while building a test context.
#[derive(Debug)]
pub enum SetupError {
    Config(ConfigError),
    Hash(AuthError),
}

/// A running storefront plus direct access to its store.
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub catalog: CatalogState,
}

impl TestContext {
    /// Build the app over an empty in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the test configuration is rejected.
    pub async fn new() -> Result<Self, SetupError> {
        let ctx = Self::loading()?;
        ctx.catalog.initialize().await;
        Ok(ctx)
    }

    /// Build the app without loading the first catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the test configuration is rejected.
    pub fn loading() -> Result<Self, SetupError> {
        let password_hash = hash_password(ADMIN_PASSWORD).map_err(SetupError::Hash)?;
        let vars: HashMap<&str, String> = HashMap::from([
            ("STOREFRONT_STORE", "memory".to_string()),
            ("STOREFRONT_BASE_URL", "http://localhost:3000".to_string()),
            ("ADMIN_USERNAME", ADMIN_USERNAME.to_string()),
            ("ADMIN_PASSWORD_HASH", password_hash),
            ("WHATSAPP_NUMBER", WHATSAPP_NUMBER.to_string()),
            ("LOGIN_DELAY_MS", "0".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .map_err(SetupError::Config)?;

        let store = Arc::new(MemoryDocumentStore::new());
        let catalog = CatalogState::new(CatalogRepository::new(store.clone()));

        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let app = build_app(AppState::new(config, catalog.clone())).layer(session_layer);

        Ok(Self {
            app,
            store,
            catalog,
        })
    }

    /// A browser with its own cookie jar.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Wait until `check` holds for the catalog's stats, or give up.
    pub async fn wait_for_stats(&self, check: impl Fn(Stats) -> bool) -> bool {
        for _ in 0..50 {
            if let Ok(stats) = self.catalog.repository().fetch_stats().await {
                if check(stats) {
                    return true;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// The chat link handed off on the page, if any.
    #[must_use]
    pub fn chat_link(&self) -> Option<&str> {
        let start = self.body.find("https://wa.me/")?;
        let rest = self.body.get(start..)?;
        rest.find('"').and_then(|end| rest.get(..end))
    }

    /// The order text carried by the handed-off chat link, decoded.
    #[must_use]
    pub fn order_message(&self) -> Option<String> {
        let (_, encoded) = self.chat_link()?.split_once("?text=")?;
        urlencoding::decode(encoded).ok().map(|text| text.into_owned())
    }

    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Sends requests through the router, carrying the session cookie.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    /// Post an urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Method::POST,
            uri,
            Some("application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    /// Send a JSON request; `None` sends an empty body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn json(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        match body {
            Some(value) => {
                self.send(
                    method,
                    uri,
                    Some("application/json"),
                    Body::from(value.to_string()),
                )
                .await
            }
            None => self.send(method, uri, None, Body::empty()).await,
        }
    }

    /// Sign in as the test admin.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn login(&mut self) -> TestResponse {
        self.post_form(
            "/login",
            &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
        )
        .await
    }

    #[allow(clippy::unwrap_used)]
    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            if let Some(pair) = value.split(';').next() {
                if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                    self.cookie = Some(pair.to_string());
                }
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
