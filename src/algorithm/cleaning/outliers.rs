//! Upper-tail winsorization
//!
//! Very long descriptions are usually concatenated pages rather than real
//! postings. Values above `Q3 + k·IQR` are clamped to that bound; the lower tail
//! is handled by the minimum-length filter instead.

use serde::Serialize;

use crate::algorithm::statistics::quantile;

/// Quartiles and the upper bound derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpperFence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub upper_bound: f64,
}

impl UpperFence {
    /// Fence over `values`; `None` when there is nothing to measure
    #[must_use]
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            upper_bound: q3 + multiplier * iqr,
        })
    }

    /// Clamp every value above the bound to it and return how many changed
    pub fn clamp<'a>(&self, values: impl IntoIterator<Item = &'a mut f64>) -> usize {
        let mut capped = 0;
        for value in values {
            if *value > self.upper_bound {
                *value = self.upper_bound;
                capped += 1;
            }
        }
        capped
    }
}
