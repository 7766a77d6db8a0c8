//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VIBE_HOST` - Bind address (default: 127.0.0.1)
//! - `VIBE_PORT` - Listen port (default: 3000)
//! - `VIBE_CATALOG_PATH` - Product catalog JSON file (default: built-in catalog)
//! - `VIBE_CURRENCY` - Display currency code (default: VND)
//! - `VIBE_CHECKOUT_DELAY_MS` - Simulated payment delay (default: 2000)
//! - `VIBE_CONFIRMATION_DELAY_MS` - Delay before the order confirmation (default: 300)
//! - `VIBE_QUANTITY_POLICY` - `clamp` or `remove` (default: clamp)
//! - `VIBE_CANCEL_CHECKOUT_ON_DISMISS` - Cancel checkout when the cart closes (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use vibe_core::CurrencyCode;

use crate::session::SessionTiming;
use crate::store::{QuantityPolicy, StoreOptions};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog file to load instead of the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Storefront behavior
    pub store: StoreOptions,
    /// Simulated payment processing time
    pub checkout_delay: Duration,
    /// Session timing
    pub session: SessionTiming,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            catalog_path: None,
            store: StoreOptions::default(),
            checkout_delay: crate::services::payment::DEFAULT_CHECKOUT_DELAY,
            session: SessionTiming::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        Ok(Self {
            host: env.parse_or("VIBE_HOST", "127.0.0.1")?,
            port: env.parse_or("VIBE_PORT", "3000")?,
            catalog_path: env.optional("VIBE_CATALOG_PATH").map(PathBuf::from),
            store: StoreOptions {
                currency: env.parse_or::<CurrencyCode>("VIBE_CURRENCY", "VND")?,
                quantity_policy: env.parse_or::<QuantityPolicy>("VIBE_QUANTITY_POLICY", "clamp")?,
                cancel_checkout_on_dismiss: env.flag("VIBE_CANCEL_CHECKOUT_ON_DISMISS")?,
            },
            checkout_delay: env.millis_or("VIBE_CHECKOUT_DELAY_MS", "2000")?,
            session: SessionTiming {
                confirmation_delay: env.millis_or("VIBE_CONFIRMATION_DELAY_MS", "300")?,
            },
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn millis_or(&self, key: &str, default: &str) -> Result<Duration, ConfigError> {
        self.parse_or::<u64>(key, default).map(Duration::from_millis)
    }

    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.or_default(key, "false").trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got {other:?}"),
            )),
        }
    }
}
