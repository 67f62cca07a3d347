//! Admin Service - validated catalog management

use shared::{PaginatedResponse, Validate};
use shared::models::{Book, PublicationStatusRequest, UpsertBookRequest};

use crate::catalog::{CatalogQuery, CatalogStore};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct AdminService {
    catalog: CatalogStore,
}

impl AdminService {
    pub fn new(catalog: CatalogStore) -> Self {
        Self { catalog }
    }

    /// Every book regardless of publication status, with the total count
    pub async fn list_books(&self) -> ServiceResult<PaginatedResponse<Book>> {
        let books = self.catalog.list_books(&CatalogQuery::default()).await?;
        Ok(PaginatedResponse::from(books))
    }

    pub async fn create_book(&self, request: UpsertBookRequest) -> ServiceResult<Book> {
        request.validate()?;
        let book = self.catalog.create_book(request).await?;
        book.validate()?;
        Ok(book)
    }

    pub async fn get_book(&self, book_id: &str) -> ServiceResult<Book> {
        self.catalog
            .find_book(book_id)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(book_id))
    }

    pub async fn update_book(
        &self,
        book_id: &str,
        request: UpsertBookRequest,
    ) -> ServiceResult<Book> {
        request.validate()?;
        self.catalog
            .update_book(book_id, request)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(book_id))
    }

    pub async fn remove_book(&self, book_id: &str) -> ServiceResult<()> {
        if !self.catalog.delete_book(book_id).await? {
            return Err(ServiceError::book_not_found(book_id));
        }
        Ok(())
    }

    pub async fn change_publication_status(
        &self,
        book_id: &str,
        request: PublicationStatusRequest,
    ) -> ServiceResult<Book> {
        self.catalog
            .update_publication_status(book_id, request.status)
            .await?
            .ok_or_else(|| ServiceError::book_not_found(book_id))
    }
}
