//! Row-level rules of the cleaning stage
//!
//! Each `drop_*` rule removes rows in place and returns how many it removed.

use crate::models::{CONFIDENTIAL_COMPANY, EnrichedPosting, UNTITLED};

fn retain_counting(rows: &mut Vec<EnrichedPosting>, keep: impl FnMut(&EnrichedPosting) -> bool) -> usize {
    let before = rows.len();
    rows.retain(keep);
    before - rows.len()
}

/// Rows without a nominal salary or a cost-of-living index
pub fn drop_missing_economics(rows: &mut Vec<EnrichedPosting>) -> usize {
    retain_counting(rows, |row| {
        row.nominal_salary.is_some() && row.cost_of_living_index.is_some()
    })
}

/// Fill missing titles and companies with their placeholders
pub fn fill_placeholders(rows: &mut [EnrichedPosting]) {
    for row in rows {
        row.title.get_or_insert_with(|| UNTITLED.to_string());
        row.company
            .get_or_insert_with(|| CONFIDENTIAL_COMPANY.to_string());
    }
}

/// Rows whose cost-of-living index is zero or negative
pub fn drop_non_positive_cost_index(rows: &mut Vec<EnrichedPosting>) -> usize {
    retain_counting(rows, |row| row.cost_of_living_index.is_some_and(|i| i > 0.0))
}

/// Rows whose country did not parse to one of the five codes
pub fn drop_invalid_country(rows: &mut Vec<EnrichedPosting>) -> usize {
    retain_counting(rows, |row| row.country.is_some())
}

/// Rows whose description is shorter than `min_length`; a missing length counts as short
pub fn drop_short_descriptions(rows: &mut Vec<EnrichedPosting>, min_length: f64) -> usize {
    retain_counting(rows, |row| row.desc_length.is_some_and(|len| len >= min_length))
}
