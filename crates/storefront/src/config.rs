//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `ADMIN_USERNAME` - Admin panel username
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC string for the admin password
//!   (generate with `mm-cli admin hash-password`)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`); only required for the `postgres` store
//!
//! ## Optional
//! - `STOREFRONT_STORE` - `postgres` (default) or `memory`
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `WHATSAPP_NUMBER` - Order chat number, digits only (default: 923290033863)
//! - `LOGIN_DELAY_MS` - Delay before checking admin credentials (default: 800)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use argon2::password_hash::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_WHATSAPP_NUMBER: &str = "923290033863";
const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where catalog documents and sessions are kept.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// `PostgreSQL` at the given URL (contains password).
    Postgres(SecretString),
    /// In-process memory; contents are lost on restart.
    Memory,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Document and session store
    pub store: StoreBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Admin login credentials
    pub admin: AdminAuthConfig,
    /// Chat number orders are sent to
    pub whatsapp_number: String,
    /// Fixed delay before validating a login attempt
    pub login_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Admin login configuration.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminAuthConfig {
    pub username: String,
    /// Argon2 PHC string; validated when loaded.
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AdminAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthConfig")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let store = match env.or_default("STOREFRONT_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres(env.database_url("STOREFRONT_DATABASE_URL")?),
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_STORE".to_string(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };
        let host = env.parsed::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let admin = AdminAuthConfig::from_env(&env)?;

        let whatsapp_number = env.or_default("WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        if whatsapp_number.is_empty() || !whatsapp_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "WHATSAPP_NUMBER".to_string(),
                "must contain digits only, including the country code".to_string(),
            ));
        }

        let login_delay = Duration::from_millis(
            env.parsed::<u64>("LOGIN_DELAY_MS", &DEFAULT_LOGIN_DELAY_MS.to_string())?,
        );

        Ok(Self {
            store,
            host,
            port,
            base_url,
            admin,
            whatsapp_number,
            login_delay,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminAuthConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let username = env.required("ADMIN_USERNAME")?;
        let password_hash = SecretString::from(env.required("ADMIN_PASSWORD_HASH")?);
        PasswordHash::new(password_hash.expose_secret()).map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_PASSWORD_HASH".to_string(), e.to_string())
        })?;

        Ok(Self {
            username,
            password_hash,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required environment variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to a default.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::auth::{AdminCredentials, hash_password};

    const PASSWORD: &str = "cupcake-fridays";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let hash = hash_password(PASSWORD).unwrap();
        let mut map: HashMap<String, String> = [
            ("STOREFRONT_STORE", "memory"),
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("ADMIN_USERNAME", "baker"),
            ("ADMIN_PASSWORD_HASH", hash.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (key, value) in pairs {
            map.insert((*key).to_string(), (*value).to_string());
        }
        map
    }

    fn load(map: &HashMap<String, String>) -> Result<StorefrontConfig, ConfigError> {
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&vars(&[])).unwrap();
        assert!(matches!(config.store, StoreBackend::Memory));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.whatsapp_number, DEFAULT_WHATSAPP_NUMBER);
        assert_eq!(config.login_delay, Duration::from_millis(800));
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_postgres_store_uses_database_url_fallback() {
        let config = load(&vars(&[
            ("STOREFRONT_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/mm"),
        ]))
        .unwrap();
        match config.store {
            StoreBackend::Postgres(url) => {
                assert_eq!(url.expose_secret(), "postgres://localhost/mm");
            }
            StoreBackend::Memory => panic!("expected postgres store"),
        }
    }

    #[test]
    fn test_postgres_store_requires_url() {
        let err = load(&vars(&[("STOREFRONT_STORE", "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_DATABASE_URL"));
    }

    #[test]
    fn test_unknown_store_rejected() {
        let err = load(&vars(&[("STOREFRONT_STORE", "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_STORE"));
    }

    #[test]
    fn test_missing_admin_username() {
        let mut map = vars(&[]);
        map.remove("ADMIN_USERNAME");
        let err = load(&map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ADMIN_USERNAME"));
    }

    #[test]
    fn test_configured_hash_verifies_password() {
        let config = load(&vars(&[])).unwrap();
        let credentials = AdminCredentials::new(&config.admin);
        assert!(credentials.verify("baker", PASSWORD).is_ok());
        assert!(credentials.verify("baker", "cupcake").is_err());
    }

    #[test]
    fn test_plaintext_password_rejected() {
        let err = load(&vars(&[("ADMIN_PASSWORD_HASH", "hunter2")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&vars(&[("STOREFRONT_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_whatsapp_number_must_be_digits() {
        let err = load(&vars(&[("WHATSAPP_NUMBER", "+92 329 0033863")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "WHATSAPP_NUMBER"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&vars(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://mousseandmelts.pk"),
            ("LOGIN_DELAY_MS", "0"),
            ("SENTRY_ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(config.login_delay, Duration::ZERO);
        assert_eq!(config.sentry_environment.as_deref(), Some("production"));
    }

    #[test]
    fn test_admin_config_debug_redacts_hash() {
        let config = load(&vars(&[])).unwrap();
        let debug_output = format!("{:?}", config.admin);
        assert!(debug_output.contains("baker"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("argon2id"));
    }
}
