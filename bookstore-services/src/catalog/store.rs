//! Catalog Store - the book list with a process-local cache
//!
//! The whole catalog is one state entry (`catalog:books`). The first load
//! writes the seed catalog when the entry is missing or empty; afterwards
//! reads are served from the cache and every change writes the full list
//! back.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use shared::models::{Book, PublicationStatus, SalesStatus, UpsertBookRequest};
use shared::seed_books;
use sidecar_client::{Deadline, SidecarClient};

use crate::error::ServiceResult;

/// State key of the book list
pub const CATALOG_KEY: &str = "catalog:books";

/// Filters for [`CatalogStore::list_books`]; all optional, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    pub tag: Option<String>,
    pub status: Option<SalesStatus>,
    pub q: Option<String>,
}

impl CatalogQuery {
    fn matches(&self, book: &Book) -> bool {
        if let Some(tag) = &self.tag
            && !book.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        if let Some(status) = self.status
            && book.status != status
        {
            return false;
        }
        match &self.q {
            Some(keyword) => book.matches_keyword(keyword),
            None => true,
        }
    }
}

/// Book list backed by the catalog state store
///
/// Clones share the cache.
#[derive(Clone)]
pub struct CatalogStore {
    client: SidecarClient,
    store_name: String,
    cache: Arc<RwLock<Option<Vec<Book>>>>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("store_name", &self.store_name)
            .field("cached", &self.cache.read().as_ref().map(Vec::len))
            .finish()
    }
}

impl CatalogStore {
    pub fn new(client: SidecarClient, store_name: impl Into<String>) -> Self {
        Self {
            client,
            store_name: store_name.into(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    async fn load(&self) -> ServiceResult<Vec<Book>> {
        let cached = self.cache.read().clone();
        if let Some(books) = cached {
            return Ok(books);
        }

        let stored: Option<Vec<Book>> = self
            .client
            .get_state(&self.store_name, CATALOG_KEY, Deadline::Default)
            .await?;
        if let Some(books) = stored
            && !books.is_empty()
        {
            tracing::debug!(count = books.len(), "Catalog loaded from state store");
            *self.cache.write() = Some(books.clone());
            return Ok(books);
        }

        let books = seed_books();
        tracing::info!(count = books.len(), store = %self.store_name, "Seeding catalog");
        self.persist(&books).await?;
        Ok(books)
    }

    async fn persist(&self, books: &[Book]) -> ServiceResult<()> {
        *self.cache.write() = Some(books.to_vec());
        self.client
            .save_state(&self.store_name, CATALOG_KEY, books, Deadline::Default)
            .await?;
        Ok(())
    }

    /// Books matching every filter in `query`
    pub async fn list_books(&self, query: &CatalogQuery) -> ServiceResult<Vec<Book>> {
        let books = self.load().await?;
        Ok(books.into_iter().filter(|b| query.matches(b)).collect())
    }

    pub async fn find_book(&self, book_id: &str) -> ServiceResult<Option<Book>> {
        let books = self.load().await?;
        Ok(books.into_iter().find(|b| b.id == book_id))
    }

    /// Append a new draft book with a generated id
    pub async fn create_book(&self, request: UpsertBookRequest) -> ServiceResult<Book> {
        let mut books = self.load().await?;
        let book = Book::from_request(uuid::Uuid::new_v4().to_string(), request);
        books.push(book.clone());
        self.persist(&books).await?;
        tracing::info!(book_id = %book.id, "Book created");
        Ok(book)
    }

    /// `None` when no book has `book_id`
    pub async fn update_book(
        &self,
        book_id: &str,
        request: UpsertBookRequest,
    ) -> ServiceResult<Option<Book>> {
        let mut books = self.load().await?;
        let Some(book) = books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(None);
        };
        book.apply(request);
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(Some(updated))
    }

    /// `false` when no book has `book_id`
    pub async fn delete_book(&self, book_id: &str) -> ServiceResult<bool> {
        let books = self.load().await?;
        let before = books.len();
        let remaining: Vec<Book> = books.into_iter().filter(|b| b.id != book_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.persist(&remaining).await?;
        tracing::info!(book_id, "Book deleted");
        Ok(true)
    }

    pub async fn update_publication_status(
        &self,
        book_id: &str,
        status: PublicationStatus,
    ) -> ServiceResult<Option<Book>> {
        let mut books = self.load().await?;
        let Some(book) = books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(None);
        };
        book.publication_status = status;
        let updated = book.clone();
        self.persist(&books).await?;
        Ok(Some(updated))
    }

    /// Make sure the catalog entry exists, seeding it if needed
    pub async fn ensure_seed(&self) -> ServiceResult<()> {
        self.load().await.map(|_| ())
    }

    /// Drop the cache; the next read goes to the state store
    pub fn reset_cache(&self) {
        *self.cache.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn store() -> CatalogStore {
        CatalogStore::new(SidecarClient::in_memory().unwrap(), "catalogstore")
    }

    fn request(title: &str) -> UpsertBookRequest {
        UpsertBookRequest {
            title: title.into(),
            author: "著者A".into(),
            description: "説明".into(),
            full_description: "詳細説明".into(),
            price: Decimal::new(1000, 0),
            status: SalesStatus::Available,
            tags: vec!["tag".into()],
            publication_year: 2025,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn first_load_seeds_state_store() {
        let store = store();
        store.ensure_seed().await.unwrap();

        let persisted: Option<Vec<Book>> = store
            .client
            .get_state("catalogstore", CATALOG_KEY, Deadline::Default)
            .await
            .unwrap();
        assert_eq!(persisted.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn filters_combine() {
        let store = store();

        let sf = store
            .list_books(&CatalogQuery {
                tag: Some("SF".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sf.len(), 1);
        assert_eq!(sf[0].id, "2");

        let available = store
            .list_books(&CatalogQuery {
                status: Some(SalesStatus::Available),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 2);

        let none = store
            .list_books(&CatalogQuery {
                status: Some(SalesStatus::Available),
                q: Some("宇宙".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());

        let coffee = store
            .list_books(&CatalogQuery {
                q: Some("珈琲".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(coffee[0].id, "3");
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let store = store();

        let created = store.create_book(request("新しい本")).await.unwrap();
        assert_eq!(created.publication_status, PublicationStatus::Draft);
        assert_eq!(store.list_books(&CatalogQuery::default()).await.unwrap().len(), 4);

        let updated = store
            .update_book(&created.id, request("改訂版"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "改訂版");
        assert_eq!(updated.id, created.id);

        assert!(store.delete_book(&created.id).await.unwrap());
        assert!(!store.delete_book(&created.id).await.unwrap());
        assert!(store.update_book("missing", request("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn publication_status_survives_cache_reset() {
        let store = store();
        let book = store
            .update_publication_status("2", PublicationStatus::Published)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.publication_status, PublicationStatus::Published);

        store.reset_cache();
        let reloaded = store.find_book("2").await.unwrap().unwrap();
        assert_eq!(reloaded.publication_status, PublicationStatus::Published);
    }

    #[tokio::test]
    async fn clones_share_cache() {
        let store = store();
        let other = store.clone();
        let created = store.create_book(request("共有")).await.unwrap();
        assert!(other.find_book(&created.id).await.unwrap().is_some());
    }
}
