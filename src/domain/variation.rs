//! Persisted grade variation records

use crate::domain::config::{FlexibleGradeConfig, GradeSaleMode};
use crate::domain::distribution::SizeDistribution;
use crate::domain::value_objects::{Color, Sku};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One sellable grade record: a colorway of a product carrying the shared
/// size distribution and optional flexible-grade config.
///
/// These are plain data records exchanged with the persistence collaborator;
/// the generator is the only constructor and establishes
/// `grade_quantity == distribution.total()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeVariation {
    pub id: Uuid,
    /// Unique within the owning store across all products.
    pub sku: Sku,
    pub color: Color,
    pub grade_name: String,
    pub distribution: SizeDistribution,
    pub grade_quantity: u32,
    pub flexible_grade_config: Option<FlexibleGradeConfig>,
    /// The mode this record was generated under. Authored records are
    /// always `Full`; half/custom are resolved at purchase time.
    pub grade_sale_mode: GradeSaleMode,
    pub is_active: bool,
    pub display_order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GradeVariation {
    pub(crate) fn new(
        sku: Sku,
        color: Color,
        grade_name: String,
        distribution: SizeDistribution,
        flexible_grade_config: Option<FlexibleGradeConfig>,
        display_order: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sku,
            color,
            grade_name,
            grade_quantity: distribution.total(),
            distribution,
            flexible_grade_config,
            grade_sale_mode: GradeSaleMode::Full,
            is_active: true,
            display_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records loaded back from storage bypass the constructor; callers
    /// re-check the quantity invariant here.
    pub fn is_consistent(&self) -> bool {
        self.distribution.validate().is_ok() && self.grade_quantity == self.distribution.total()
    }
}
