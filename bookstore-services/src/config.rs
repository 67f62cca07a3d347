//! Service configuration

use std::collections::HashMap;

use sidecar_client::ClientConfig;

use crate::logger;

/// Store, topic and peer names shared by the bookstore services
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_STATE_STORE | catalogstore | State store holding the book list |
/// | CART_STATE_STORE | cartstore | State store holding carts |
/// | ORDER_STATE_STORE | orderstore | State store holding orders |
/// | ORDER_PUBSUB_NAME | bookstore-pubsub | Pub/sub component for order events |
/// | CATALOG_APP_ID | catalog-service | App id of the catalog service |
/// | CATALOG_SERVICE_URL | http://localhost:4101 | Direct catalog URL when the sidecar is unreachable |
/// | LOG_LEVEL | info | Default log level (`RUST_LOG` wins) |
///
/// Sidecar variables are read by [`ClientConfig::from_vars`].
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_state_store: String,
    pub cart_state_store: String,
    pub order_state_store: String,
    pub order_pubsub_name: String,
    pub catalog_app_id: String,
    pub catalog_service_url: String,
    pub log_level: String,
    /// Sidecar connection
    pub sidecar: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(std::iter::empty())
    }
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let var = |name: &str, default: &str| {
            vars.get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            catalog_state_store: var("CATALOG_STATE_STORE", "catalogstore"),
            cart_state_store: var("CART_STATE_STORE", "cartstore"),
            order_state_store: var("ORDER_STATE_STORE", "orderstore"),
            order_pubsub_name: var("ORDER_PUBSUB_NAME", "bookstore-pubsub"),
            catalog_app_id: var("CATALOG_APP_ID", "catalog-service"),
            catalog_service_url: var("CATALOG_SERVICE_URL", "http://localhost:4101"),
            log_level: var("LOG_LEVEL", "info"),
            sidecar: ClientConfig::from_vars(vars.clone()),
        }
    }

    /// Defaults with an in-memory sidecar, used by tests and local runs
    pub fn in_memory() -> Self {
        Self {
            sidecar: ClientConfig::in_memory(),
            ..Self::default()
        }
    }

    pub fn with_sidecar(mut self, sidecar: ClientConfig) -> Self {
        self.sidecar = sidecar;
        self
    }

    pub fn with_catalog_service_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_service_url = url.into();
        self
    }
}

/// Load `.env`, install the logger and return the resulting configuration
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    logger::init_logger(&config.log_level)?;
    Ok(config)
}
