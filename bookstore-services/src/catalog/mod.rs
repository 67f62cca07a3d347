//! Catalog access
//!
//! - [`CatalogStore`]: owns the book list (catalog and admin services)
//! - [`CatalogClient`]: looks books up from cart and order services

mod client;
mod store;

pub use client::CatalogClient;
pub use store::{CATALOG_KEY, CatalogQuery, CatalogStore};
