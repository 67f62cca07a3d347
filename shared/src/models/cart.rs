//! Cart Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationResult, validate_non_negative, validate_quantity};

/// Line in a cart; `unit_price` is filled in from the catalog on read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub book_id: String,
    pub quantity: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub unit_price: Option<Decimal>,
}

impl Validate for CartItem {
    fn validate(&self) -> ValidationResult {
        validate_quantity(self.quantity, "quantity")?;
        if let Some(price) = self.unit_price {
            validate_non_negative(price, "unitPrice")?;
        }
        Ok(())
    }
}

/// Shopping cart of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Single item payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub book_id: String,
    pub quantity: u32,
}

impl Validate for CartItemRequest {
    fn validate(&self) -> ValidationResult {
        validate_quantity(self.quantity, "quantity")
    }
}

/// Whole-cart replacement payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUpdateRequest {
    pub items: Vec<CartItemRequest>,
}

impl Validate for CartUpdateRequest {
    fn validate(&self) -> ValidationResult {
        self.items.validate()
    }
}

/// Quantity change payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartQuantityRequest {
    pub quantity: u32,
}

impl Validate for CartQuantityRequest {
    fn validate(&self) -> ValidationResult {
        validate_quantity(self.quantity, "quantity")
    }
}
