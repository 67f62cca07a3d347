//! Service errors
//!
//! | Variant | HTTP status | Code |
//! |---------|-------------|------|
//! | NotFound | 404 | NOT_FOUND |
//! | Validation | 400 | BAD_REQUEST |
//! | Sidecar | 500 | INTERNAL_ERROR |

use http::StatusCode;
use shared::ValidationError;
use sidecar_client::SidecarError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn book_not_found(book_id: &str) -> Self {
        Self::NotFound(format!("Book {book_id} not found"))
    }

    /// Status a route layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Sidecar(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Validation(_) => "BAD_REQUEST",
            ServiceError::Sidecar(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}
