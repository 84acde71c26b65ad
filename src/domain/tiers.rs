//! Wholesale tier tables

use crate::domain::value_objects::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity threshold above which a discounted unit price applies.
///
/// Exactly one of `price` / `discount_percentage` should be set; when both
/// are, `price` wins. A tier with neither is inert and skipped at lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WholesaleTier {
    pub tier_name: String,
    pub min_quantity: u32,
    pub price: Option<Money>,
    pub discount_percentage: Option<Decimal>,
}

impl WholesaleTier {
    pub fn is_inert(&self) -> bool {
        self.price.is_none() && self.discount_percentage.is_none()
    }
}

/// Sorts tiers by `min_quantity` ascending and drops exact-threshold
/// duplicates (first occurrence wins), so lookup is deterministic no matter
/// how the merchant ordered the table.
pub fn normalize_tiers(mut tiers: Vec<WholesaleTier>) -> Vec<WholesaleTier> {
    tiers.sort_by_key(|t| t.min_quantity);
    tiers.dedup_by_key(|t| t.min_quantity);
    tiers
}

/// Outcome of a unit-price resolution. Computed on demand, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceCalculationResult {
    /// Effective per-unit price.
    pub price: Money,
    /// Discount percent vs. the retail baseline, rounded for display,
    /// clamped to 0 when the unit price meets or exceeds retail.
    pub percentage: u8,
    /// The tier applied, if any.
    pub current_tier: Option<WholesaleTier>,
}
