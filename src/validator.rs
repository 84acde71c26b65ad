//! Structural validation of flexible grade configs before persistence

use crate::domain::config::{FlexibleGradeConfig, PricingMode};
use serde::Serialize;
use thiserror::Error;

/// One structural problem in a config. Each rule produces its own kind so
/// the editing UI can display every problem at once.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigIssue {
    #[error("no sale mode is enabled")]
    NoModeEnabled,
    #[error("half-grade percentage {value} is outside 25-75")]
    PercentageOutOfRange { value: u8 },
    #[error("half-grade discount {value} is outside 0-50")]
    DiscountOutOfRange { value: u8 },
    #[error("{field} must be positive")]
    NonPositiveMinimum { field: &'static str },
    #[error("custom mix color limit {value} must be at least 1")]
    InvalidColorLimit { value: u32 },
}

/// Collected validation outcome. Issues block persistence; warnings are
/// advisory and never block.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ConfigIssue>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}

/// Gates configs produced by the editing UI. Rules are checked in full,
/// never fail-fast.
pub struct GradeConfigValidator;

impl GradeConfigValidator {
    pub fn validate(config: &FlexibleGradeConfig) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !config.allow_full_grade && !config.allow_half_grade && !config.allow_custom_mix {
            report.issues.push(ConfigIssue::NoModeEnabled);
        }
        if !(25..=75).contains(&config.half_grade_percentage) {
            report
                .issues
                .push(ConfigIssue::PercentageOutOfRange { value: config.half_grade_percentage });
        }
        if config.half_grade_discount_percentage > 50 {
            report.issues.push(ConfigIssue::DiscountOutOfRange {
                value: config.half_grade_discount_percentage,
            });
        }
        if config.half_grade_min_pairs == 0 {
            report
                .issues
                .push(ConfigIssue::NonPositiveMinimum { field: "half_grade_min_pairs" });
        }
        if config.custom_mix_min_pairs == 0 {
            report
                .issues
                .push(ConfigIssue::NonPositiveMinimum { field: "custom_mix_min_pairs" });
        }
        if config.custom_mix_max_colors < 1 {
            report
                .issues
                .push(ConfigIssue::InvalidColorLimit { value: config.custom_mix_max_colors });
        }

        if config.allow_half_grade && config.half_grade_discount_percentage == 0 {
            report.warnings.push(
                "half-grade discount is 0% — consider incentivizing half-grade purchases".into(),
            );
        }
        if config.allow_custom_mix
            && !config.custom_mix_allow_any_size
            && config.custom_mix_allowed_sizes.is_empty()
        {
            report
                .warnings
                .push("custom mix restricts sizes but the allowed-sizes list is empty".into());
        }
        if config.apply_quantity_tiers && config.pricing_mode != PricingMode::TierBased {
            report.warnings.push(format!(
                "quantity tiers are enabled but pricing mode is {:?}",
                config.pricing_mode
            ));
        }

        report
    }
}
