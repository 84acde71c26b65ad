//! Grade Pricing & Distribution Engine
//!
//! Business rules that turn a configurable "grade" (a multi-size bundle,
//! e.g. a shoe size run) into priced, purchasable units.
//!
//! ## Features
//! - Full / half / custom-mix sale mode resolution
//! - Largest-remainder half-grade apportionment (exact totals, no drift)
//! - Tiered wholesale pricing with per-pair or per-grade thresholds
//! - Bulk variation generation with store-unique SKUs
//! - Collecting config validation with non-blocking warnings
//!
//! The engine is a library of pure, synchronous functions over the domain
//! model: no I/O, no logging, no shared mutable state. Persistence and
//! display are external collaborators that exchange plain data records with
//! this crate (the generator's SKU lookup is an injected capability, and
//! regeneration is a full replace owned by the caller).
//!
//! ```
//! use grade_pricing::domain::config::FlexibleGradeConfig;
//! use grade_pricing::domain::distribution::SizeDistribution;
//! use grade_pricing::resolver::GradeSaleModeResolver;
//!
//! let config = FlexibleGradeConfig {
//!     allow_half_grade: true,
//!     half_grade_percentage: 50,
//!     half_grade_min_pairs: 2,
//!     half_grade_discount_percentage: 10,
//!     ..FlexibleGradeConfig::default()
//! };
//! let full = SizeDistribution::new(
//!     vec!["36".into(), "37".into(), "38".into()],
//!     vec![2, 4, 2],
//! )?;
//! let half = GradeSaleModeResolver::new(&config).resolve_half(&full, None)?;
//! assert_eq!(half.distribution.total(), 4);
//! # Ok::<(), grade_pricing::Error>(())
//! ```

use thiserror::Error;

pub mod domain;
pub mod generator;
pub mod pricing;
pub mod resolver;
pub mod validator;

pub use domain::config::{
    FlexibleGradeConfig, GradeSaleMode, HalfGradeDistribution, PricingMode, TierCalculationMode,
};
pub use domain::distribution::{DistributionError, SizeDistribution};
pub use domain::tiers::{PriceCalculationResult, WholesaleTier};
pub use domain::value_objects::{Color, ColorError, Money, MoneyError, Sku, SkuError};
pub use domain::variation::GradeVariation;
pub use generator::{GenerateError, GenerateRequest, GradeVariationGenerator, SkuLookup};
pub use pricing::{PriceContext, PriceError, TierPriceCalculator};
pub use resolver::{GradeSaleModeResolver, ResolveError, ResolvedGrade};
pub use validator::{ConfigIssue, GradeConfigValidator, ValidationReport};

// =============================================================================
// Error Types
// =============================================================================

/// Umbrella error for callers that funnel every engine operation through
/// one result type. Component APIs return their own narrower enums.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Sku(#[from] SkuError),

    #[error(transparent)]
    Color(#[from] ColorError),
}

pub type Result<T> = std::result::Result<T, Error>;
