//! Catalog lookups from other services

use shared::ApiResponse;
use shared::models::Book;
use sidecar_client::{InvokeOptions, SidecarClient};

use super::store::CatalogStore;
use crate::config::Config;
use crate::error::ServiceResult;

/// Reads books the way cart and order services see them
///
/// In-memory clients read the local [`CatalogStore`]; otherwise the catalog
/// service is invoked through the sidecar, falling back to its direct URL.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: SidecarClient,
    store: CatalogStore,
    app_id: String,
    service_url: String,
}

impl CatalogClient {
    pub fn new(client: SidecarClient, store: CatalogStore, config: &Config) -> Self {
        Self {
            client,
            store,
            app_id: config.catalog_app_id.clone(),
            service_url: config.catalog_service_url.clone(),
        }
    }

    /// `None` when the catalog has no such book (including a 404 from the service)
    pub async fn fetch_book(&self, book_id: &str) -> ServiceResult<Option<Book>> {
        if self.client.is_in_memory() {
            return self.store.find_book(book_id).await;
        }

        let path = format!("catalog/books/{book_id}");
        let options = InvokeOptions::get().with_fallback_url(&self.service_url);

        match self
            .client
            .invoke_as::<ApiResponse<Book>>(&self.app_id, &path, &options)
            .await
        {
            Ok(response) => Ok(response.map(ApiResponse::into_inner)),
            Err(err) if err.is_not_found() => {
                tracing::debug!(book_id, "Catalog has no such book");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
