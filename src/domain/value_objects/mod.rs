//! Value objects shared across the grade pricing engine

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Monetary amount in integer minor units (cents).
///
/// All internal currency math stays in minor units; `Decimal` is used only
/// for fraction math (discount application) and display conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: String,
}

impl Money {
    pub fn from_minor(minor: i64, currency: &str) -> Self {
        Self { minor, currency: currency.to_string() }
    }

    /// Converts a major-unit amount (e.g. `30.00`) to minor units,
    /// rounding half away from zero.
    pub fn from_decimal(amount: Decimal, currency: &str) -> Self {
        let minor = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX);
        Self::from_minor(minor, currency)
    }

    pub fn zero(currency: &str) -> Self { Self::from_minor(0, currency) }
    pub fn minor(&self) -> i64 { self.minor }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_zero(&self) -> bool { self.minor == 0 }
    pub fn is_negative(&self) -> bool { self.minor < 0 }

    /// Major-unit view for display.
    pub fn as_decimal(&self) -> Decimal { Decimal::new(self.minor, 2) }

    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(Money::from_minor(self.minor.saturating_add(other.minor), &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::from_minor(self.minor.saturating_mul(i64::from(qty)), &self.currency)
    }

    /// Applies a percentage discount. The fraction is kept exact until the
    /// final rounding back to a minor unit (half away from zero).
    pub fn apply_discount_percent(&self, percent: Decimal) -> Money {
        let factor = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        let minor = (Decimal::from(self.minor) * factor)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(self.minor);
        Money::from_minor(minor, &self.currency)
    }
}

impl Default for Money {
    fn default() -> Self { Self::zero("USD") }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_decimal(), self.currency)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
}

/// SKU (Stock Keeping Unit) value object.
///
/// Normalized on construction: trimmed, uppercased, internal whitespace
/// collapsed to a single `-`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, SkuError> {
        let value: String = value
            .into()
            .trim()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > 64 { return Err(SkuError::TooLong { len: value.len() }); }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkuError {
    #[error("SKU is empty")]
    Empty,
    #[error("SKU too long ({len} chars, max 64)")]
    TooLong { len: usize },
}

/// Colorway label. Display form preserves the merchant's casing; equality
/// for dedup purposes goes through `canonical()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Result<Self, ColorError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(ColorError::Empty); }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str { &self.0 }
    pub fn canonical(&self) -> String { self.0.to_lowercase() }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color label is empty")]
    Empty,
}
