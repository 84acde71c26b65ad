//! Bulk generation of grade variation records at product-authoring time

use crate::domain::config::FlexibleGradeConfig;
use crate::domain::distribution::SizeDistribution;
use crate::domain::value_objects::{Color, Sku, SkuError};
use crate::domain::variation::GradeVariation;
use std::collections::HashSet;
use thiserror::Error;

/// Injected existing-SKU lookup, standing in for the store's persistence
/// layer so generation is testable without a datastore.
pub trait SkuLookup {
    fn exists(&self, sku: &Sku) -> bool;
}

impl<F: Fn(&Sku) -> bool> SkuLookup for F {
    fn exists(&self, sku: &Sku) -> bool {
        self(sku)
    }
}

/// One bulk-generate request: a merchant-chosen color set sharing a single
/// distribution and optional config.
#[derive(Clone, Debug)]
pub struct GenerateRequest<'a> {
    /// Input order is preserved as display order.
    pub colors: &'a [Color],
    pub distribution: &'a SizeDistribution,
    pub config: Option<&'a FlexibleGradeConfig>,
    /// Feeds the SKU slug together with each color.
    pub product_name: &'a str,
    /// Display label carried onto every generated record.
    pub grade_name: &'a str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no colors selected")]
    EmptyColorSet,
    #[error("distribution has no pairs")]
    EmptyDistribution,
    #[error("color {color} appears more than once")]
    DuplicateColor { color: String },
    #[error("no unique SKU found for {base} within {attempts} attempts")]
    SkuGenerationExhausted { base: String, attempts: u32 },
    #[error(transparent)]
    Sku(#[from] SkuError),
}

const MAX_SKU_ATTEMPTS: u32 = 1000;

/// Materializes one [`GradeVariation`] per color, all-or-nothing.
///
/// Regeneration is a full replace: callers delete previously persisted
/// variations for the product before writing the returned set. The
/// generator never merges against prior records.
pub struct GradeVariationGenerator {
    max_sku_attempts: u32,
}

impl Default for GradeVariationGenerator {
    fn default() -> Self {
        Self { max_sku_attempts: MAX_SKU_ATTEMPTS }
    }
}

impl GradeVariationGenerator {
    /// `max_sku_attempts` bounds the collision-avoidance loop per color.
    pub fn with_max_sku_attempts(max_sku_attempts: u32) -> Self {
        Self { max_sku_attempts }
    }

    pub fn generate(
        &self,
        request: GenerateRequest<'_>,
        lookup: &dyn SkuLookup,
    ) -> Result<Vec<GradeVariation>, GenerateError> {
        if request.colors.is_empty() {
            return Err(GenerateError::EmptyColorSet);
        }
        // Deserialized distributions can bypass construction invariants.
        if request.distribution.validate().is_err() {
            return Err(GenerateError::EmptyDistribution);
        }
        let mut seen = HashSet::new();
        for color in request.colors {
            if !seen.insert(color.canonical()) {
                return Err(GenerateError::DuplicateColor { color: color.as_str().to_string() });
            }
        }

        let mut batch: HashSet<Sku> = HashSet::new();
        let mut variations = Vec::with_capacity(request.colors.len());
        for (index, color) in request.colors.iter().enumerate() {
            let sku = self.unique_sku(request.product_name, color, lookup, &batch)?;
            batch.insert(sku.clone());
            variations.push(GradeVariation::new(
                sku,
                color.clone(),
                request.grade_name.to_string(),
                request.distribution.clone(),
                request.config.cloned(),
                index as u32,
            ));
        }
        Ok(variations)
    }

    // Deterministic base slug from product name + color, disambiguated with
    // an incrementing numeric suffix against both the store and this batch.
    fn unique_sku(
        &self,
        product_name: &str,
        color: &Color,
        lookup: &dyn SkuLookup,
        batch: &HashSet<Sku>,
    ) -> Result<Sku, GenerateError> {
        let base = Sku::new(format!("{} {}", product_name, color.as_str()))?;
        let mut candidate = base.clone();
        let mut attempts = 0u32;
        while lookup.exists(&candidate) || batch.contains(&candidate) {
            attempts += 1;
            if attempts >= self.max_sku_attempts {
                return Err(GenerateError::SkuGenerationExhausted {
                    base: base.as_str().to_string(),
                    attempts,
                });
            }
            candidate = Sku::new(format!("{}-{}", base.as_str(), attempts + 1))?;
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn colors(names: &[&str]) -> Vec<Color> {
        names.iter().map(|n| Color::new(*n).unwrap()).collect()
    }

    fn distribution() -> SizeDistribution {
        SizeDistribution::new(
            vec!["36".into(), "37".into(), "38".into()],
            vec![2, 4, 2],
        )
        .unwrap()
    }

    fn no_existing(_: &Sku) -> bool {
        false
    }

    #[test]
    fn generates_one_variation_per_color_in_order() {
        let colors = colors(&["Black", "White", "Red"]);
        let dist = distribution();
        let request = GenerateRequest {
            colors: &colors,
            distribution: &dist,
            config: None,
            product_name: "Runner Pro",
            grade_name: "Standard run",
        };
        let variations = GradeVariationGenerator::default().generate(request, &no_existing).unwrap();
        assert_eq!(variations.len(), 3);
        for (i, v) in variations.iter().enumerate() {
            assert_eq!(v.display_order, i as u32);
            assert_eq!(v.grade_quantity, 8);
            assert_eq!(v.grade_name, "Standard run");
            assert!(v.is_consistent());
        }
        assert_eq!(variations[0].sku.as_str(), "RUNNER-PRO-BLACK");
        assert_eq!(variations[2].color.as_str(), "Red");
    }

    #[test]
    fn skus_avoid_existing_store_records() {
        let mut store = HashSet::new();
        store.insert(Sku::new("RUNNER-PRO-BLACK").unwrap());
        store.insert(Sku::new("RUNNER-PRO-BLACK-2").unwrap());
        let colors = colors(&["Black"]);
        let dist = distribution();
        let request = GenerateRequest {
            colors: &colors,
            distribution: &dist,
            config: None,
            product_name: "Runner Pro",
            grade_name: "g",
        };
        let lookup = |sku: &Sku| store.contains(sku);
        let variations = GradeVariationGenerator::default().generate(request, &lookup).unwrap();
        assert_eq!(variations[0].sku.as_str(), "RUNNER-PRO-BLACK-3");
    }

    #[test]
    fn empty_color_set_rejected() {
        let dist = distribution();
        let request = GenerateRequest {
            colors: &[],
            distribution: &dist,
            config: None,
            product_name: "P",
            grade_name: "g",
        };
        let err = GradeVariationGenerator::default().generate(request, &no_existing).unwrap_err();
        assert_eq!(err, GenerateError::EmptyColorSet);
    }

    #[test]
    fn duplicate_colors_rejected() {
        let colors = colors(&["Black", "black"]);
        let dist = distribution();
        let request = GenerateRequest {
            colors: &colors,
            distribution: &dist,
            config: None,
            product_name: "P",
            grade_name: "g",
        };
        let err = GradeVariationGenerator::default().generate(request, &no_existing).unwrap_err();
        assert_eq!(err, GenerateError::DuplicateColor { color: "black".into() });
    }

    #[test]
    fn exhaustion_is_reachable_with_saturated_lookup() {
        let everything_taken = |_: &Sku| true;
        let colors = colors(&["Black"]);
        let dist = distribution();
        let request = GenerateRequest {
            colors: &colors,
            distribution: &dist,
            config: None,
            product_name: "P",
            grade_name: "g",
        };
        let err = GradeVariationGenerator::with_max_sku_attempts(5)
            .generate(request, &everything_taken)
            .unwrap_err();
        assert!(matches!(err, GenerateError::SkuGenerationExhausted { attempts: 5, .. }));
    }

    #[test]
    fn config_is_carried_onto_every_record() {
        let config = FlexibleGradeConfig { allow_half_grade: true, ..FlexibleGradeConfig::default() };
        let colors = colors(&["Black", "White"]);
        let dist = distribution();
        let request = GenerateRequest {
            colors: &colors,
            distribution: &dist,
            config: Some(&config),
            product_name: "P",
            grade_name: "g",
        };
        let variations = GradeVariationGenerator::default().generate(request, &no_existing).unwrap();
        assert!(variations.iter().all(|v| v.flexible_grade_config.as_ref() == Some(&config)));
    }

    proptest! {
        #[test]
        fn batch_skus_are_pairwise_distinct(n in 1usize..20, clash in any::<bool>()) {
            // same-name colors forced distinct only by suffixing would be a
            // DuplicateColor error, so vary the labels
            let labels: Vec<Color> =
                (0..n).map(|i| Color::new(format!("c{i}")).unwrap()).collect();
            let dist = distribution();
            let store: HashSet<Sku> = if clash {
                (0..n).map(|i| Sku::new(format!("P-C{i}")).unwrap()).collect()
            } else {
                HashSet::new()
            };
            let request = GenerateRequest {
                colors: &labels,
                distribution: &dist,
                config: None,
                product_name: "P",
                grade_name: "g",
            };
            let lookup = |sku: &Sku| store.contains(sku);
            let variations =
                GradeVariationGenerator::default().generate(request, &lookup).unwrap();
            let mut seen = HashSet::new();
            for v in &variations {
                prop_assert!(seen.insert(v.sku.clone()), "duplicate sku in batch");
                prop_assert!(!store.contains(&v.sku), "sku collides with store");
            }
        }
    }
}
