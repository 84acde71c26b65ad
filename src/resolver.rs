//! Sale-mode resolution: turns a full grade plus a config into the concrete
//! distribution and per-unit price adjustment offered to the buyer.

use crate::domain::config::{FlexibleGradeConfig, GradeSaleMode, HalfGradeDistribution};
use crate::domain::distribution::{DistributionError, SizeDistribution};
use crate::domain::value_objects::{Color, Money, MoneyError};
use rust_decimal::Decimal;
use thiserror::Error;

/// The concrete offer for one sale mode: what sizes ship and how the unit
/// price moves relative to the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGrade {
    pub mode: GradeSaleMode,
    pub distribution: SizeDistribution,
    /// Percentage discount on the unit price (half grade only, otherwise 0).
    pub discount_percentage: u8,
    /// Flat per-unit delta (custom mix only, otherwise zero).
    pub price_adjustment: Money,
}

impl ResolvedGrade {
    /// Applies this mode's discount, then its flat adjustment, to a base
    /// unit price.
    pub fn apply_to_price(&self, base: &Money) -> Result<Money, MoneyError> {
        let discounted = if self.discount_percentage > 0 {
            base.apply_discount_percent(Decimal::from(self.discount_percentage))
        } else {
            base.clone()
        };
        if self.price_adjustment.is_zero() {
            Ok(discounted)
        } else {
            discounted.checked_add(&self.price_adjustment)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{mode} grade sales are disabled for this product")]
    ModeDisabled { mode: GradeSaleMode },
    #[error("minimum for this mode is {required} pairs, requested {actual}")]
    BelowMinimum { required: u32, actual: u32 },
    #[error("custom mix is limited to {limit} colors, requested {requested}")]
    TooManyColors { limit: u32, requested: u32 },
    #[error("size {size} is not offered for custom mix")]
    SizeNotAllowed { size: String },
    #[error("half grade is configured for merchant-selected sizes but none were supplied")]
    CustomHalfMissing,
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Resolves a requested sale mode against a validated config.
///
/// The config is taken as already gated by
/// [`crate::validator::GradeConfigValidator`]; an invalid config fails
/// closed on the specific operation it cannot satisfy.
pub struct GradeSaleModeResolver<'a> {
    config: &'a FlexibleGradeConfig,
}

impl<'a> GradeSaleModeResolver<'a> {
    pub fn new(config: &'a FlexibleGradeConfig) -> Self {
        Self { config }
    }

    /// Dispatch by requested mode. `custom_half` feeds the half-grade
    /// custom-distribution path; `selections` feeds custom mix.
    pub fn resolve(
        &self,
        mode: GradeSaleMode,
        full: &SizeDistribution,
        custom_half: Option<&SizeDistribution>,
        selections: &[(Color, SizeDistribution)],
    ) -> Result<ResolvedGrade, ResolveError> {
        match mode {
            GradeSaleMode::Full => self.resolve_full(full),
            GradeSaleMode::Half => self.resolve_half(full, custom_half),
            GradeSaleMode::Custom => self.resolve_custom_mix(selections),
        }
    }

    /// Full grade: the merchant-defined run, unchanged, at baseline price.
    pub fn resolve_full(&self, full: &SizeDistribution) -> Result<ResolvedGrade, ResolveError> {
        if !self.config.allow_full_grade {
            return Err(ResolveError::ModeDisabled { mode: GradeSaleMode::Full });
        }
        Ok(ResolvedGrade {
            mode: GradeSaleMode::Full,
            distribution: full.clone(),
            discount_percentage: 0,
            price_adjustment: Money::zero(self.config.custom_mix_price_adjustment.currency()),
        })
    }

    /// Half grade: a configured percentage of the full run.
    ///
    /// Proportional selection uses largest-remainder apportionment so the
    /// result's total hits the target exactly; independent per-size rounding
    /// can drift by several pairs on long runs.
    pub fn resolve_half(
        &self,
        full: &SizeDistribution,
        custom: Option<&SizeDistribution>,
    ) -> Result<ResolvedGrade, ResolveError> {
        if !self.config.allow_half_grade {
            return Err(ResolveError::ModeDisabled { mode: GradeSaleMode::Half });
        }

        let distribution = match self.config.half_grade_distribution {
            HalfGradeDistribution::Proportional => {
                let target = round_half_up(
                    u64::from(full.total()) * u64::from(self.config.half_grade_percentage),
                    100,
                );
                if target == 0 {
                    return Err(ResolveError::BelowMinimum {
                        required: self.config.half_grade_min_pairs,
                        actual: 0,
                    });
                }
                apportion(full, target as u32)?
            }
            // Merchant pre-selected the sizes; only the total is checked.
            // The selection is not constrained to the full run's sizes.
            HalfGradeDistribution::Custom => {
                custom.ok_or(ResolveError::CustomHalfMissing)?.clone()
            }
        };

        let actual = distribution.total();
        if actual < self.config.half_grade_min_pairs {
            return Err(ResolveError::BelowMinimum {
                required: self.config.half_grade_min_pairs,
                actual,
            });
        }

        Ok(ResolvedGrade {
            mode: GradeSaleMode::Half,
            distribution,
            discount_percentage: self.config.half_grade_discount_percentage,
            price_adjustment: Money::zero(self.config.custom_mix_price_adjustment.currency()),
        })
    }

    /// Custom mix: buyer-assembled (color, distribution) selections merged
    /// into one bundle within the configured limits.
    pub fn resolve_custom_mix(
        &self,
        selections: &[(Color, SizeDistribution)],
    ) -> Result<ResolvedGrade, ResolveError> {
        if !self.config.allow_custom_mix {
            return Err(ResolveError::ModeDisabled { mode: GradeSaleMode::Custom });
        }

        let mut distinct: Vec<String> = Vec::new();
        for (color, _) in selections {
            let canonical = color.canonical();
            if !distinct.contains(&canonical) {
                distinct.push(canonical);
            }
        }
        let requested = distinct.len() as u32;
        if requested > self.config.custom_mix_max_colors {
            return Err(ResolveError::TooManyColors {
                limit: self.config.custom_mix_max_colors,
                requested,
            });
        }

        if !self.config.custom_mix_allow_any_size {
            for (_, dist) in selections {
                for (size, pairs) in dist.entries() {
                    if pairs > 0 && !self.config.custom_mix_allowed_sizes.iter().any(|s| s == size) {
                        return Err(ResolveError::SizeNotAllowed { size: size.to_string() });
                    }
                }
            }
        }

        // Merge: quantities summed per size, first-occurrence order kept.
        let mut sizes: Vec<String> = Vec::new();
        let mut pairs: Vec<u32> = Vec::new();
        for (_, dist) in selections {
            for (size, qty) in dist.entries() {
                match sizes.iter().position(|s| s == size) {
                    Some(i) => pairs[i] += qty,
                    None => {
                        sizes.push(size.to_string());
                        pairs.push(qty);
                    }
                }
            }
        }

        let total: u32 = pairs.iter().sum();
        if total < self.config.custom_mix_min_pairs {
            return Err(ResolveError::BelowMinimum {
                required: self.config.custom_mix_min_pairs,
                actual: total,
            });
        }

        Ok(ResolvedGrade {
            mode: GradeSaleMode::Custom,
            distribution: SizeDistribution::new(sizes, pairs)?,
            discount_percentage: 0,
            price_adjustment: self.config.custom_mix_price_adjustment.clone(),
        })
    }
}

fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

/// Largest-remainder apportionment of `target` pairs across the full run.
///
/// Each size gets the floor of its exact share; the leftover pairs go one at
/// a time to the sizes with the largest fractional residual, input order
/// breaking ties. The result always sums to `target` exactly.
fn apportion(full: &SizeDistribution, target: u32) -> Result<SizeDistribution, DistributionError> {
    let total = u64::from(full.total());
    let target64 = u64::from(target);

    let mut scaled: Vec<u32> = Vec::with_capacity(full.len());
    let mut residuals: Vec<(usize, u64)> = Vec::with_capacity(full.len());
    let mut allocated: u64 = 0;
    for (i, &qty) in full.pairs().iter().enumerate() {
        let exact = u64::from(qty) * target64;
        let floor = exact / total;
        scaled.push(floor as u32);
        residuals.push((i, exact % total));
        allocated += floor;
    }

    // Stable sort keeps input order among equal residuals.
    residuals.sort_by(|a, b| b.1.cmp(&a.1));
    let mut leftover = target64.saturating_sub(allocated);
    for (i, _) in residuals {
        if leftover == 0 {
            break;
        }
        scaled[i] += 1;
        leftover -= 1;
    }

    SizeDistribution::new(full.sizes().to_vec(), scaled)
}
