//! Tiered wholesale price calculation

use crate::domain::config::TierCalculationMode;
use crate::domain::tiers::{normalize_tiers, PriceCalculationResult, WholesaleTier};
use crate::domain::value_objects::{Money, MoneyError};
use crate::resolver::ResolvedGrade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything the storefront knows about a product's price model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceContext {
    pub retail_price: Money,
    pub wholesale_price: Option<Money>,
    pub min_wholesale_qty: Option<u32>,
    pub price_tiers: Vec<WholesaleTier>,
    pub enable_gradual_wholesale: bool,
    pub tier_calculation_mode: TierCalculationMode,
}

impl PriceContext {
    /// Retail-only context, the shape of a product with no wholesale setup.
    pub fn retail_only(retail_price: Money) -> Self {
        Self {
            retail_price,
            wholesale_price: None,
            min_wholesale_qty: None,
            price_tiers: Vec::new(),
            enable_gradual_wholesale: false,
            tier_calculation_mode: TierCalculationMode::PerPair,
        }
    }

    /// Assembles the price model from a product's stored prices and its
    /// flexible grade config: tiers are consulted only when the config
    /// enables them, and the config decides the threshold mode.
    pub fn for_config(
        retail_price: Money,
        wholesale_price: Option<Money>,
        min_wholesale_qty: Option<u32>,
        price_tiers: Vec<WholesaleTier>,
        config: &crate::domain::config::FlexibleGradeConfig,
    ) -> Self {
        Self {
            retail_price,
            wholesale_price,
            min_wholesale_qty,
            price_tiers,
            enable_gradual_wholesale: config.apply_quantity_tiers,
            tier_calculation_mode: config.tier_calculation_mode,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Resolves the effective unit price for a requested quantity.
///
/// Construction normalizes the tier table (sorted ascending, duplicate
/// thresholds dropped) so lookup is deterministic.
pub struct TierPriceCalculator {
    ctx: PriceContext,
}

impl TierPriceCalculator {
    pub fn new(mut ctx: PriceContext) -> Self {
        ctx.price_tiers = normalize_tiers(std::mem::take(&mut ctx.price_tiers));
        Self { ctx }
    }

    pub fn context(&self) -> &PriceContext { &self.ctx }

    /// Effective unit price for `quantity` purchased units.
    ///
    /// `grade_total` is the bundle's total pair count, consulted only under
    /// `TierCalculationMode::PerGrade`; callers without one fall back to the
    /// purchase quantity.
    pub fn calculate(
        &self,
        quantity: u32,
        grade_total: Option<u32>,
    ) -> Result<PriceCalculationResult, PriceError> {
        if quantity == 0 {
            return Err(PriceError::InvalidQuantity);
        }

        let (price, current_tier) =
            if !self.ctx.enable_gradual_wholesale || self.ctx.price_tiers.is_empty() {
                (self.simple_price(quantity)?, None)
            } else {
                // The effective quantity matters only for tier lookup: a
                // grade bundles many pairs sold as one purchasable unit.
                let effective_qty = match self.ctx.tier_calculation_mode {
                    TierCalculationMode::PerPair => quantity,
                    TierCalculationMode::PerGrade => grade_total.unwrap_or(quantity),
                };
                self.tier_price(effective_qty)?
            };

        let percentage = discount_percentage(&self.ctx.retail_price, &price);
        Ok(PriceCalculationResult { price, percentage, current_tier })
    }

    /// Storefront helper: tier price for the quantity, then the resolved
    /// sale mode's discount and flat adjustment on top.
    pub fn price_for_mode(
        &self,
        resolved: &ResolvedGrade,
        quantity: u32,
    ) -> Result<PriceCalculationResult, PriceError> {
        let base = self.calculate(quantity, Some(resolved.distribution.total()))?;
        let price = resolved.apply_to_price(&base.price)?;
        let percentage = discount_percentage(&self.ctx.retail_price, &price);
        Ok(PriceCalculationResult { price, percentage, current_tier: base.current_tier })
    }

    // Two-tier rule: wholesale price at or above the minimum quantity,
    // retail below it.
    fn simple_price(&self, quantity: u32) -> Result<Money, PriceError> {
        if let (Some(wholesale), Some(min_qty)) =
            (self.ctx.wholesale_price.as_ref(), self.ctx.min_wholesale_qty)
        {
            if quantity >= min_qty {
                self.check_currency(wholesale)?;
                return Ok(wholesale.clone());
            }
        }
        Ok(self.ctx.retail_price.clone())
    }

    // Highest threshold at or below the effective quantity wins; inert
    // tiers are skipped; no qualifying tier falls back to retail.
    fn tier_price(&self, effective_qty: u32) -> Result<(Money, Option<WholesaleTier>), PriceError> {
        let applicable = self
            .ctx
            .price_tiers
            .iter()
            .rfind(|t| !t.is_inert() && t.min_quantity <= effective_qty);

        let Some(tier) = applicable else {
            return Ok((self.ctx.retail_price.clone(), None));
        };

        let price = if let Some(price) = &tier.price {
            self.check_currency(price)?;
            price.clone()
        } else if let Some(discount) = tier.discount_percentage {
            self.ctx.retail_price.apply_discount_percent(discount)
        } else {
            // inert tiers are filtered above; keep retail as a safe fallback
            self.ctx.retail_price.clone()
        };
        Ok((price, Some(tier.clone())))
    }

    // Misconfigured currencies surface as an error rather than mixing units.
    fn check_currency(&self, other: &Money) -> Result<(), PriceError> {
        if other.currency() != self.ctx.retail_price.currency() {
            return Err(MoneyError::CurrencyMismatch {
                left: self.ctx.retail_price.currency().to_string(),
                right: other.currency().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Display discount percent vs. retail, rounded to the nearest integer and
/// clamped to 0 when the unit price meets or exceeds retail.
fn discount_percentage(retail: &Money, unit: &Money) -> u8 {
    if unit.minor() >= retail.minor() || retail.minor() <= 0 {
        return 0;
    }
    let pct = (Decimal::from(retail.minor() - unit.minor()) / Decimal::from(retail.minor())
        * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    pct.to_u8().unwrap_or(100).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, "USD")
    }

    fn tier(name: &str, min: u32, price_minor: i64) -> WholesaleTier {
        WholesaleTier {
            tier_name: name.into(),
            min_quantity: min,
            price: Some(usd(price_minor)),
            discount_percentage: None,
        }
    }

    #[test]
    fn retail_only_single_unit() {
        let calc = TierPriceCalculator::new(PriceContext::retail_only(usd(3000)));
        let result = calc.calculate(1, None).unwrap();
        assert_eq!(result.price, usd(3000));
        assert_eq!(result.percentage, 0);
        assert!(result.current_tier.is_none());
    }

    #[test]
    fn simple_wholesale_at_threshold() {
        let ctx = PriceContext {
            wholesale_price: Some(usd(2400)),
            min_wholesale_qty: Some(12),
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        let result = calc.calculate(12, None).unwrap();
        assert_eq!(result.price, usd(2400));
        assert_eq!(result.percentage, 20);

        let below = calc.calculate(11, None).unwrap();
        assert_eq!(below.price, usd(3000));
        assert_eq!(below.percentage, 0);
    }

    #[test]
    fn zero_quantity_is_invalid() {
        let calc = TierPriceCalculator::new(PriceContext::retail_only(usd(3000)));
        assert_eq!(calc.calculate(0, None).unwrap_err(), PriceError::InvalidQuantity);
    }

    #[test]
    fn gradual_tiers_select_highest_qualifying() {
        let ctx = PriceContext {
            price_tiers: vec![tier("dozen", 12, 2600), tier("case", 24, 2200), tier("pallet", 96, 1800)],
            enable_gradual_wholesale: true,
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        assert_eq!(calc.calculate(5, None).unwrap().price, usd(3000));
        assert_eq!(calc.calculate(12, None).unwrap().price, usd(2600));
        assert_eq!(calc.calculate(30, None).unwrap().price, usd(2200));
        let best = calc.calculate(200, None).unwrap();
        assert_eq!(best.price, usd(1800));
        assert_eq!(best.current_tier.unwrap().tier_name, "pallet");
        assert_eq!(best.percentage, 40);
    }

    #[test]
    fn discount_percentage_tier() {
        let ctx = PriceContext {
            price_tiers: vec![WholesaleTier {
                tier_name: "bulk".into(),
                min_quantity: 10,
                price: None,
                discount_percentage: Some(Decimal::new(125, 1)), // 12.5%
            }],
            enable_gradual_wholesale: true,
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        let result = calc.calculate(10, None).unwrap();
        assert_eq!(result.price, usd(2625)); // 30.00 - 12.5% = 26.25
        assert_eq!(result.percentage, 13); // display rounds 12.5 up
    }

    #[test]
    fn inert_tiers_are_skipped() {
        let ctx = PriceContext {
            price_tiers: vec![
                WholesaleTier { tier_name: "broken".into(), min_quantity: 5, price: None, discount_percentage: None },
                tier("dozen", 12, 2400),
            ],
            enable_gradual_wholesale: true,
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        assert!(calc.calculate(8, None).unwrap().current_tier.is_none());
        assert_eq!(calc.calculate(12, None).unwrap().price, usd(2400));
    }

    #[test]
    fn per_grade_mode_uses_grade_total() {
        let ctx = PriceContext {
            price_tiers: vec![tier("dozen", 12, 2400)],
            enable_gradual_wholesale: true,
            tier_calculation_mode: TierCalculationMode::PerGrade,
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        // one grade purchased, but the grade bundles 12 pairs
        assert_eq!(calc.calculate(1, Some(12)).unwrap().price, usd(2400));
        // no grade total supplied: falls back to the purchase quantity
        assert_eq!(calc.calculate(1, None).unwrap().price, usd(3000));
    }

    #[test]
    fn config_decides_whether_tiers_apply() {
        use crate::domain::config::FlexibleGradeConfig;

        let tiers = vec![tier("dozen", 12, 2400)];
        let off = FlexibleGradeConfig::default();
        let calc = TierPriceCalculator::new(PriceContext::for_config(
            usd(3000), None, None, tiers.clone(), &off,
        ));
        assert_eq!(calc.calculate(12, None).unwrap().price, usd(3000));

        let on = FlexibleGradeConfig {
            apply_quantity_tiers: true,
            tier_calculation_mode: TierCalculationMode::PerGrade,
            ..FlexibleGradeConfig::default()
        };
        let calc = TierPriceCalculator::new(PriceContext::for_config(usd(3000), None, None, tiers, &on));
        assert_eq!(calc.calculate(1, Some(12)).unwrap().price, usd(2400));
    }

    #[test]
    fn tier_price_above_retail_shows_zero_percent() {
        let ctx = PriceContext {
            price_tiers: vec![tier("premium", 1, 3500)],
            enable_gradual_wholesale: true,
            ..PriceContext::retail_only(usd(3000))
        };
        let calc = TierPriceCalculator::new(ctx);
        let result = calc.calculate(2, None).unwrap();
        assert_eq!(result.price, usd(3500));
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn price_for_mode_composes_half_grade_discount() {
        use crate::domain::config::FlexibleGradeConfig;
        use crate::domain::distribution::SizeDistribution;
        use crate::resolver::GradeSaleModeResolver;

        let config = FlexibleGradeConfig {
            allow_half_grade: true,
            half_grade_percentage: 50,
            half_grade_min_pairs: 2,
            half_grade_discount_percentage: 10,
            ..FlexibleGradeConfig::default()
        };
        let full = SizeDistribution::new(
            vec!["36".into(), "37".into(), "38".into()],
            vec![2, 4, 2],
        )
        .unwrap();
        let resolved = GradeSaleModeResolver::new(&config).resolve_half(&full, None).unwrap();

        let calc = TierPriceCalculator::new(PriceContext::retail_only(usd(3000)));
        let result = calc.price_for_mode(&resolved, 1).unwrap();
        assert_eq!(result.price, usd(2700));
        assert_eq!(result.percentage, 10);
    }

    proptest! {
        #[test]
        fn unit_price_is_non_increasing_in_quantity(
            thresholds in prop::collection::vec(1u32..200, 1..6),
            q in 1u32..400,
        ) {
            // tier prices decrease as thresholds increase
            let mut sorted = thresholds.clone();
            sorted.sort_unstable();
            sorted.dedup();
            let tiers: Vec<WholesaleTier> = sorted
                .iter()
                .enumerate()
                .map(|(i, &min)| tier(&format!("t{i}"), min, 3000 - 100 * (i as i64 + 1)))
                .collect();
            let ctx = PriceContext {
                price_tiers: tiers,
                enable_gradual_wholesale: true,
                ..PriceContext::retail_only(usd(3000))
            };
            let calc = TierPriceCalculator::new(ctx);
            let at_q = calc.calculate(q, None).unwrap().price;
            let at_q1 = calc.calculate(q + 1, None).unwrap().price;
            prop_assert!(at_q1.minor() <= at_q.minor());
        }
    }
}
