//! Data models
//!
//! Shared between the bookstore services and their HTTP callers.
//! JSON field names are camelCase; money is `Decimal` carried as a JSON number.

pub mod book;
pub mod cart;
pub mod order;

// Re-exports
pub use book::*;
pub use cart::*;
pub use order::*;
