//! Shared types for the bookstore services
//!
//! Domain models, response envelopes, the seed catalog and request
//! validation used by every service crate.

pub mod models;
pub mod response;
pub mod seed;
pub mod validation;

// Re-exports
pub use response::{ApiResponse, PaginatedResponse};
pub use seed::seed_books;
pub use serde::{Deserialize, Serialize};
pub use validation::{Validate, ValidationError, ValidationResult, checked_total};
