//! Mousse & Melts Storefront - Bakery shop, chat checkout, and admin panel.
//!
//! This binary serves the public storefront and the admin panel on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - Catalog documents in `PostgreSQL` (or in memory for local runs)
//! - Orders handed off to WhatsApp chat; no payment processing
//!
//! # Security
//!
//! - One configured admin, verified against an Argon2 hash
//! - Server-side sessions; the cookie only carries the session ID

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use axum::ServiceExt;
use axum::extract::Request;
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mousse_melts_storefront::build_app;
use mousse_melts_storefront::config::{ConfigError, StoreBackend, StorefrontConfig};
use mousse_melts_storefront::db::{
    self, CatalogRepository, DocumentStore, MemoryDocumentStore, PgDocumentStore,
};
use mousse_melts_storefront::middleware::create_session_layer;
use mousse_melts_storefront::services::catalog::CatalogState;
use mousse_melts_storefront::state::AppState;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create database pool: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Catalog state over the given document store, still marked as loading.
fn catalog_over(store: Arc<dyn DocumentStore>) -> CatalogState {
    CatalogState::new(CatalogRepository::new(store))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("{e}");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{e}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mousse_melts_storefront=info,tower_http=debug".into());

    // Use JSON format on Fly.io for structured log parsing, text format locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p mousse-melts-cli -- migrate
    let (app, catalog): (Router, CatalogState) = match &config.store {
        StoreBackend::Postgres(database_url) => {
            let pool = db::create_pool(database_url).await?;
            tracing::info!("Database pool created");

            let catalog = catalog_over(Arc::new(PgDocumentStore::new(pool.clone())));
            let session_layer = create_session_layer(PostgresStore::new(pool), &config);
            let app =
                build_app(AppState::new(config.clone(), catalog.clone())).layer(session_layer);
            (app, catalog)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; catalog and sessions are lost on restart");

            let catalog = catalog_over(Arc::new(MemoryDocumentStore::new()));
            let session_layer = create_session_layer(MemoryStore::default(), &config);
            let app =
                build_app(AppState::new(config.clone(), catalog.clone())).layer(session_layer);
            (app, catalog)
        }
    };

    // Sentry layers (outermost for full request coverage)
    let app = app
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // `/cart/` and `/cart` are the same page
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Pages render the loading placeholder until the first snapshot lands
    catalog.spawn_initialize();

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
