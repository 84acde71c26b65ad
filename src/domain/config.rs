//! Flexible grade configuration

use crate::domain::value_objects::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the sale mode was requested by the buyer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeSaleMode {
    #[default]
    Full,
    Half,
    Custom,
}

impl GradeSaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeSaleMode::Full => "full",
            GradeSaleMode::Half => "half",
            GradeSaleMode::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(GradeSaleMode::Full),
            "half" => Some(GradeSaleMode::Half),
            "custom" => Some(GradeSaleMode::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for GradeSaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// How half-grade sizes/quantities are selected from the full run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfGradeDistribution {
    /// Scale every size by the configured percentage (largest-remainder
    /// rounding keeps the total exact).
    #[default]
    Proportional,
    /// The merchant pre-selects explicit sizes and quantities.
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    #[default]
    UnitBased,
    TierBased,
    Custom,
}

/// Which quantity a wholesale tier threshold is evaluated against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierCalculationMode {
    /// The purchase quantity itself.
    #[default]
    PerPair,
    /// The grade's total pair count (a grade bundles many pairs sold as
    /// one purchasable unit).
    PerGrade,
}

/// Per-product configuration of the flexible grade sale modes.
///
/// Arrives from a loosely-typed settings blob; serde field defaults let a
/// partial blob deserialize, and [`crate::validator::GradeConfigValidator`]
/// gates it before the resolver or calculator ever see it. A product with no
/// config at all sells full grade only, no discounts — the same shape as
/// `FlexibleGradeConfig::default()`, which call sites pass explicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexibleGradeConfig {
    pub allow_full_grade: bool,
    pub allow_half_grade: bool,
    pub allow_custom_mix: bool,

    /// Fraction of the full distribution included in a half grade, [25, 75].
    pub half_grade_percentage: u8,
    pub half_grade_min_pairs: u32,
    pub half_grade_distribution: HalfGradeDistribution,
    /// Additional discount on the half-grade unit price, [0, 50].
    pub half_grade_discount_percentage: u8,

    pub custom_mix_min_pairs: u32,
    /// Max distinct colors combinable in one custom-mix purchase.
    pub custom_mix_max_colors: u32,
    pub custom_mix_allow_any_size: bool,
    /// Consulted only when `custom_mix_allow_any_size` is false.
    pub custom_mix_allowed_sizes: Vec<String>,
    /// Flat per-unit price delta for custom-mix purchases (may be negative).
    pub custom_mix_price_adjustment: Money,

    pub pricing_mode: PricingMode,
    pub apply_quantity_tiers: bool,
    pub tier_calculation_mode: TierCalculationMode,
}

impl Default for FlexibleGradeConfig {
    /// The explicit "no config" shape: full grade only, no discounts.
    fn default() -> Self {
        Self {
            allow_full_grade: true,
            allow_half_grade: false,
            allow_custom_mix: false,
            half_grade_percentage: 50,
            half_grade_min_pairs: 6,
            half_grade_distribution: HalfGradeDistribution::Proportional,
            half_grade_discount_percentage: 0,
            custom_mix_min_pairs: 6,
            custom_mix_max_colors: 3,
            custom_mix_allow_any_size: true,
            custom_mix_allowed_sizes: Vec::new(),
            custom_mix_price_adjustment: Money::default(),
            pricing_mode: PricingMode::UnitBased,
            apply_quantity_tiers: false,
            tier_calculation_mode: TierCalculationMode::PerPair,
        }
    }
}
