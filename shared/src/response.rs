//! API Response types
//!
//! Envelopes used by every bookstore service:
//! ```json
//! { "data": { ... } }
//! { "data": [ ... ], "total": 3 }
//! ```

use serde::{Deserialize, Serialize};

/// Single-value response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// List response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}

impl<T> From<Vec<T>> for PaginatedResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelopes_serialize_data_field() {
        assert_eq!(
            serde_json::to_value(ApiResponse::new("x")).unwrap(),
            json!({"data": "x"})
        );
        assert_eq!(
            serde_json::to_value(PaginatedResponse::from(vec![1, 2])).unwrap(),
            json!({"data": [1, 2], "total": 2})
        );
    }
}
