//! Book Model

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{
    Validate, ValidationResult, validate_non_negative, validate_optional_url,
};

/// Whether a book can be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalesStatus {
    Available,
    ComingSoon,
    SoldOut,
}

/// Editorial state of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Book entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub full_description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: SalesStatus,
    pub tags: Vec<String>,
    pub publication_year: u32,
    #[serde(default)]
    pub publication_status: PublicationStatus,
}

impl Book {
    /// New draft book from a create payload
    pub fn from_request(id: impl Into<String>, request: UpsertBookRequest) -> Self {
        Self {
            id: id.into(),
            title: request.title,
            author: request.author,
            description: request.description,
            full_description: request.full_description,
            image_url: request.image_url,
            price: request.price,
            status: request.status,
            tags: request.tags,
            publication_year: request.publication_year,
            publication_status: PublicationStatus::Draft,
        }
    }

    /// Overwrite every editable field, keeping id and publication status
    pub fn apply(&mut self, request: UpsertBookRequest) {
        self.title = request.title;
        self.author = request.author;
        self.description = request.description;
        self.full_description = request.full_description;
        self.image_url = request.image_url;
        self.price = request.price;
        self.status = request.status;
        self.tags = request.tags;
        self.publication_year = request.publication_year;
    }

    /// Case-insensitive match against title, author and both descriptions,
    /// searched as one space-joined text
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        [
            self.title.as_str(),
            self.author.as_str(),
            self.description.as_str(),
            self.full_description.as_str(),
        ]
        .join(" ")
        .to_lowercase()
        .contains(&keyword)
    }
}

impl Validate for Book {
    fn validate(&self) -> ValidationResult {
        validate_non_negative(self.price, "price")?;
        validate_optional_url(&self.image_url, "imageUrl")
    }
}

fn current_year() -> u32 {
    chrono::Utc::now().year().max(0) as u32
}

/// Create / update book payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBookRequest {
    pub title: String,
    pub author: String,
    pub description: String,
    pub full_description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: SalesStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "current_year")]
    pub publication_year: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Validate for UpsertBookRequest {
    fn validate(&self) -> ValidationResult {
        validate_non_negative(self.price, "price")?;
        validate_optional_url(&self.image_url, "imageUrl")
    }
}

/// Publication status change payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationStatusRequest {
    pub status: PublicationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let book: Book = serde_json::from_value(json!({
            "id": "1",
            "title": "風の谷の物語",
            "author": "山田花子",
            "description": "d",
            "fullDescription": "fd",
            "price": 1800,
            "status": "coming-soon",
            "tags": ["文学"],
            "publicationYear": 2023
        }))
        .unwrap();

        assert_eq!(book.price, Decimal::new(1800, 0));
        assert_eq!(book.status, SalesStatus::ComingSoon);
        assert_eq!(book.publication_status, PublicationStatus::Draft);
        assert!(book.image_url.is_none());
    }

    #[test]
    fn upsert_defaults_tags_and_year() {
        let request: UpsertBookRequest = serde_json::from_value(json!({
            "title": "t",
            "author": "a",
            "description": "d",
            "fullDescription": "fd",
            "price": 0,
            "status": "available"
        }))
        .unwrap();

        assert!(request.tags.is_empty());
        assert_eq!(request.publication_year, current_year());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<PublicationStatusRequest>(json!({"status": "deleted"}));
        assert!(result.is_err());
    }

    #[test]
    fn keyword_search_is_case_insensitive() {
        let book = Book {
            id: "x".into(),
            title: "Coffee Afternoon".into(),
            author: "Nakamura".into(),
            description: String::new(),
            full_description: "A quiet café".into(),
            image_url: None,
            price: Decimal::ZERO,
            status: SalesStatus::Available,
            tags: vec![],
            publication_year: 2021,
            publication_status: PublicationStatus::Published,
        };
        assert!(book.matches_keyword("coffee"));
        assert!(book.matches_keyword("  CAFÉ "));
        assert!(!book.matches_keyword("tea"));
    }

    #[test]
    fn keyword_may_span_adjacent_fields() {
        let book = Book {
            id: "3".into(),
            title: "珈琲店の午後".into(),
            author: "中村絵里".into(),
            description: "d".into(),
            full_description: "fd".into(),
            image_url: None,
            price: Decimal::new(1500, 0),
            status: SalesStatus::Available,
            tags: vec![],
            publication_year: 2021,
            publication_status: PublicationStatus::Published,
        };
        assert!(book.matches_keyword("珈琲店の午後 中村絵里"));
        assert!(book.matches_keyword("午後 中村"));
        assert!(!book.matches_keyword("午後中村"));
    }
}
