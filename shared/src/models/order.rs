//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{
    Validate, ValidationResult, validate_non_negative, validate_not_empty,
    validate_optional_exact_len, validate_quantity,
};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Authorized,
    Captured,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    ApplePay,
    GooglePay,
}

/// Delivery address (Japanese layout)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
}

/// Order line, priced at creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub book_id: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl Validate for OrderItem {
    fn validate(&self) -> ValidationResult {
        validate_quantity(self.quantity, "quantity")?;
        validate_non_negative(self.unit_price, "unitPrice")
    }
}

/// Order payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default)]
    pub card_last4: Option<String>,
}

impl Payment {
    /// Authorized card payment; keeps the last four characters of the token
    pub fn authorize_card(payment_token: &str) -> Self {
        Self {
            method: PaymentMethod::CreditCard,
            status: PaymentStatus::Authorized,
            card_last4: Some(card_last4(payment_token)),
        }
    }
}

impl Validate for Payment {
    fn validate(&self) -> ValidationResult {
        validate_optional_exact_len(&self.card_last4, "cardLast4", 4)
    }
}

/// Last four characters of a token, left-padded with `0`
pub fn card_last4(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{tail:0>4}")
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub payment: Payment,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Validate for Order {
    fn validate(&self) -> ValidationResult {
        self.items.validate()?;
        validate_non_negative(self.total_amount, "totalAmount")?;
        self.payment.validate()
    }
}

/// Requested order line, before pricing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub book_id: String,
    pub quantity: u32,
}

impl Validate for CreateOrderItem {
    fn validate(&self) -> ValidationResult {
        validate_quantity(self.quantity, "quantity")
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<CreateOrderItem>,
    pub payment_token: String,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> ValidationResult {
        validate_not_empty(&self.items, "items")?;
        self.items.validate()
    }
}

/// Status change payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStatusChangeRequest {
    pub status: OrderStatus,
}

/// Payload of `orders.created`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedEvent {
    pub order_id: String,
    pub user_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderCreatedEvent {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Payload of `orders.status-changed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChangedEvent {
    pub order_id: String,
    pub previous_status: OrderStatus,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}
