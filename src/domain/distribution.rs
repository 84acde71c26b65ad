//! Size distributions: a named, ordered run of (size, quantity) pairs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An ordered run of sizes with a pair quantity per size, e.g. one grade box
/// holding sizes 36-40 in fixed quantities.
///
/// Order is significant (small to large as the merchant entered it) and the
/// run is immutable once built; edits produce a new distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDistribution {
    sizes: Vec<String>,
    pairs: Vec<u32>,
}

impl SizeDistribution {
    pub fn new(sizes: Vec<String>, pairs: Vec<u32>) -> Result<Self, DistributionError> {
        if sizes.len() != pairs.len() {
            return Err(DistributionError::LengthMismatch {
                sizes: sizes.len(),
                pairs: pairs.len(),
            });
        }
        if pairs.iter().all(|&p| p == 0) {
            return Err(DistributionError::EmptyDistribution);
        }
        Ok(Self { sizes, pairs })
    }

    /// Boundary constructor for quantities arriving from an untrusted
    /// settings blob, where negative values are representable.
    pub fn from_raw(sizes: Vec<String>, pairs: Vec<i64>) -> Result<Self, DistributionError> {
        if let Some(index) = pairs.iter().position(|&p| p < 0) {
            return Err(DistributionError::NegativeQuantity { index, value: pairs[index] });
        }
        let pairs = pairs
            .into_iter()
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .collect();
        Self::new(sizes, pairs)
    }

    pub fn sizes(&self) -> &[String] { &self.sizes }
    pub fn pairs(&self) -> &[u32] { &self.pairs }
    pub fn len(&self) -> usize { self.sizes.len() }
    pub fn is_empty(&self) -> bool { self.sizes.is_empty() }

    /// Total pair count across all sizes.
    pub fn total(&self) -> u32 { self.pairs.iter().sum() }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.sizes.iter().map(String::as_str).zip(self.pairs.iter().copied())
    }

    /// Projects onto a subset of size slots, preserving order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self, DistributionError> {
        let mut sizes = Vec::with_capacity(indices.len());
        let mut pairs = Vec::with_capacity(indices.len());
        for &i in indices {
            if i >= self.sizes.len() {
                return Err(DistributionError::IndexOutOfRange { index: i, len: self.sizes.len() });
            }
            sizes.push(self.sizes[i].clone());
            pairs.push(self.pairs[i]);
        }
        Self::new(sizes, pairs)
    }

    /// Re-runs construction invariants. Deserialized values bypass `new`,
    /// so callers holding untrusted records check here before use.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.sizes.len() != self.pairs.len() {
            return Err(DistributionError::LengthMismatch {
                sizes: self.sizes.len(),
                pairs: self.pairs.len(),
            });
        }
        if self.total() == 0 {
            return Err(DistributionError::EmptyDistribution);
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    #[error("sizes and pairs differ in length ({sizes} vs {pairs})")]
    LengthMismatch { sizes: usize, pairs: usize },
    #[error("distribution has no pairs")]
    EmptyDistribution,
    #[error("negative quantity {value} at index {index}")]
    NegativeQuantity { index: usize, value: i64 },
    #[error("size index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
