//! Descriptive statistics over the cleaned table
//!
//! This module provides the quantile used for outlier bounding and the
//! per-country summary printed at the end of a run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{CleanPosting, Country};

/// Quantile of already sorted values using linear interpolation between ranks
///
/// Uses position `(n - 1) * q`, the default of the usual dataframe libraries.
/// Returns `None` for an empty slice.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Quantile of unsorted values; non-finite values are ignored
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// Arithmetic mean; `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnSummary {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted)?,
            median: quantile_sorted(&sorted, 0.5)?,
            min: *sorted.first()?,
            max: *sorted.last()?,
        })
    }
}

/// Per-country figures of the cleaned table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountrySummary {
    pub postings: usize,
    pub mean_adjusted_salary: f64,
    pub cost_of_living_index: f64,
    /// Share of postings flagged remote, between 0 and 1
    pub remote_share: f64,
}

/// Descriptive summary of a cleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveSummary {
    pub total_postings: usize,
    pub remote_postings: usize,
    pub by_country: BTreeMap<Country, CountrySummary>,
    pub desc_length: Option<ColumnSummary>,
    pub adjusted_salary: Option<ColumnSummary>,
}

impl DescriptiveSummary {
    #[must_use]
    pub fn from_postings(postings: &[CleanPosting]) -> Self {
        let mut grouped: BTreeMap<Country, Vec<&CleanPosting>> = BTreeMap::new();
        for posting in postings {
            grouped.entry(posting.country).or_default().push(posting);
        }

        let by_country = grouped
            .into_iter()
            .map(|(country, rows)| {
                let count = rows.len();
                let salaries: Vec<f64> = rows.iter().map(|p| p.adjusted_salary).collect();
                let indices: Vec<f64> = rows.iter().map(|p| p.cost_of_living_index).collect();
                let remote = rows.iter().filter(|p| p.remote).count();
                (
                    country,
                    CountrySummary {
                        postings: count,
                        mean_adjusted_salary: mean(&salaries).unwrap_or_default(),
                        cost_of_living_index: mean(&indices).unwrap_or_default(),
                        remote_share: remote as f64 / count as f64,
                    },
                )
            })
            .collect();

        let lengths: Vec<f64> = postings.iter().map(|p| p.desc_length).collect();
        let salaries: Vec<f64> = postings.iter().map(|p| p.adjusted_salary).collect();

        Self {
            total_postings: postings.len(),
            remote_postings: postings.iter().filter(|p| p.remote).count(),
            by_country,
            desc_length: ColumnSummary::from_values(&lengths),
            adjusted_salary: ColumnSummary::from_values(&salaries),
        }
    }
}

impl fmt::Display for DescriptiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job Market Summary:")?;
        writeln!(f, "  Total Postings: {}", self.total_postings)?;
        let remote_pct = if self.total_postings > 0 {
            self.remote_postings as f64 / self.total_postings as f64 * 100.0
        } else {
            0.0
        };
        writeln!(
            f,
            "  Remote/Hybrid Postings: {} ({remote_pct:.1}%)",
            self.remote_postings
        )?;

        if !self.by_country.is_empty() {
            writeln!(f, "\nBy Country:")?;
            for (country, summary) in &self.by_country {
                writeln!(
                    f,
                    "  {country}: {} postings, mean adjusted salary {:.2}, cost index {:.1}, remote {:.1}%",
                    summary.postings,
                    summary.mean_adjusted_salary,
                    summary.cost_of_living_index,
                    summary.remote_share * 100.0
                )?;
            }
        }

        if let Some(desc) = &self.desc_length {
            writeln!(f, "\nDescription Length:")?;
            writeln!(
                f,
                "  Mean: {:.2}  Median: {:.2}  Min: {:.0}  Max: {:.2}",
                desc.mean, desc.median, desc.min, desc.max
            )?;
        }

        if let Some(salary) = &self.adjusted_salary {
            writeln!(f, "\nAdjusted Salary:")?;
            writeln!(
                f,
                "  Mean: {:.2}  Median: {:.2}  Min: {:.2}  Max: {:.2}",
                salary.mean, salary.median, salary.min, salary.max
            )?;
        }

        Ok(())
    }
}
