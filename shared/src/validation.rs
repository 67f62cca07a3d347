//! Input validation helpers
//!
//! Request payloads implement [`Validate`]; the helpers below keep the
//! individual rules in one place.

use rust_decimal::Decimal;
use thiserror::Error;

/// A payload field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// Types that can check their own invariants
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> ValidationResult {
        self.iter().try_for_each(Validate::validate)
    }
}

/// Amounts of money cannot be negative
pub fn validate_non_negative(value: Decimal, field: &str) -> ValidationResult {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

/// Quantities start at one
pub fn validate_quantity(value: u32, field: &str) -> ValidationResult {
    if value < 1 {
        return Err(ValidationError::new(field, "must be at least 1"));
    }
    Ok(())
}

/// Optional URL, if present, must parse as an absolute URL
pub fn validate_optional_url(value: &Option<String>, field: &str) -> ValidationResult {
    if let Some(raw) = value
        && url::Url::parse(raw).is_err()
    {
        return Err(ValidationError::new(field, "must be a valid URL"));
    }
    Ok(())
}

/// Optional string, if present, must have exactly `len` characters
pub fn validate_optional_exact_len(
    value: &Option<String>,
    field: &str,
    len: usize,
) -> ValidationResult {
    if let Some(v) = value
        && v.chars().count() != len
    {
        return Err(ValidationError::new(
            field,
            format!("must be exactly {len} characters"),
        ));
    }
    Ok(())
}

/// Sum of `price * quantity` over `lines`; totals beyond `Decimal::MAX` are rejected
pub fn checked_total<I>(lines: I, field: &str) -> Result<Decimal, ValidationError>
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, (price, quantity)| {
            price
                .checked_mul(Decimal::from(quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or_else(|| ValidationError::new(field, "amount is too large"))
        })
}

/// Collections that must not be empty
pub fn validate_not_empty<T>(items: &[T], field: &str) -> ValidationResult {
    if items.is_empty() {
        return Err(ValidationError::new(field, "must contain at least 1 element"));
    }
    Ok(())
}
