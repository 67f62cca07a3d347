//! Bookstore services on top of the sidecar client
//!
//! Library side of the catalog, cart, order and admin services. Each service
//! works against a [`SidecarClient`]; in-memory clients make the whole set
//! runnable without a sidecar.
//!
//! # Example
//!
//! ```no_run
//! use bookstore_services::{Services, setup_environment};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = setup_environment()?;
//! let services = Services::new(&config)?;
//! let cart = services.cart.get_cart("user-1").await?;
//! println!("{} items", cart.items.len());
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logger;
pub mod order;

pub use admin::AdminService;
pub use cart::CartService;
pub use catalog::{CatalogClient, CatalogQuery, CatalogStore};
pub use config::{Config, setup_environment};
pub use error::{ServiceError, ServiceResult};
pub use order::OrderService;

use sidecar_client::{SidecarClient, SidecarResult};

/// Every service wired to one sidecar client
#[derive(Debug, Clone)]
pub struct Services {
    pub client: SidecarClient,
    pub catalog: CatalogStore,
    pub catalog_client: CatalogClient,
    pub cart: CartService,
    pub order: OrderService,
    pub admin: AdminService,
}

impl Services {
    pub fn new(config: &Config) -> SidecarResult<Self> {
        Ok(Self::with_client(SidecarClient::new(&config.sidecar)?, config))
    }

    pub fn with_client(client: SidecarClient, config: &Config) -> Self {
        let catalog = CatalogStore::new(client.clone(), &config.catalog_state_store);
        let catalog_client = CatalogClient::new(client.clone(), catalog.clone(), config);
        Self {
            cart: CartService::new(client.clone(), catalog_client.clone(), config),
            order: OrderService::new(client.clone(), catalog_client.clone(), config),
            admin: AdminService::new(catalog.clone()),
            catalog,
            catalog_client,
            client,
        }
    }
}
