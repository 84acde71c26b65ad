//! Domain model: value objects, size distributions, grade configuration,
//! wholesale tiers, and persisted variation records.

pub mod config;
pub mod distribution;
pub mod tiers;
pub mod value_objects;
pub mod variation;
