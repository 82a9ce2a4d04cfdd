//! Country-level economic indicators
//!
//! Two independent sources describe each country: the macro source gives a mean
//! PPP-adjusted salary and the curated cost-of-living table gives a cost and a
//! rent index. Both are keyed by [`Country`] and merged into
//! [`CountryEconomics`] before postings are joined onto them.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::warn;
use serde::Serialize;

use crate::common::traits::BatchAdapter;
use crate::error::Result;
use crate::models::Country;
use crate::schema::Column;
use crate::utils::arrow::{
    extract_float64_column, extract_string_column, float64_array, string_array,
};

/// Mean nominal salary for one country
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroRecord {
    pub country: Country,
    /// Mean PPP-adjusted salary; `None` when every source value was unusable
    pub nominal_salary: Option<f64>,
}

/// Cost and rent indices for one country
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostOfLivingRecord {
    pub country: Country,
    pub cost_of_living_index: Option<f64>,
    pub rent_index: Option<f64>,
}

/// Indices used when no curated cost-of-living file exists
pub const FALLBACK_COST_OF_LIVING: [(Country, f64, f64); 5] = [
    (Country::Spain, 48.7, 18.2),
    (Country::Germany, 63.5, 22.8),
    (Country::UnitedKingdom, 61.3, 26.9),
    (Country::UnitedStates, 72.9, 43.1),
    (Country::France, 68.7, 21.5),
];

impl CostOfLivingRecord {
    /// The fixed five-country fallback table
    #[must_use]
    pub fn fallback_table() -> Vec<Self> {
        FALLBACK_COST_OF_LIVING
            .iter()
            .map(|&(country, cost, rent)| CostOfLivingRecord {
                country,
                cost_of_living_index: Some(cost),
                rent_index: Some(rent),
            })
            .collect()
    }
}

impl BatchAdapter for CostOfLivingRecord {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new(Column::Country.name(), DataType::Utf8, false),
            Column::CostOfLivingIndex.field(),
            Column::RentIndex.field(),
        ])
    }

    /// Rows whose country is not one of the five codes are skipped with a warning
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let countries = extract_string_column(batch, Column::Country.name(), true)?;
        let costs = extract_float64_column(batch, Column::CostOfLivingIndex.name(), true)?;
        let rents = extract_float64_column(batch, Column::RentIndex.name(), false)?;

        let mut records = Vec::with_capacity(countries.len());
        for ((code, cost), rent) in countries.into_iter().zip(costs).zip(rents) {
            match code.as_deref().and_then(Country::from_code) {
                Some(country) => records.push(CostOfLivingRecord {
                    country,
                    cost_of_living_index: cost,
                    rent_index: rent,
                }),
                None => warn!(
                    "Skipping cost-of-living row with country '{}'",
                    code.unwrap_or_default()
                ),
            }
        }
        Ok(records)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let columns = vec![
            string_array(rows.iter().map(|r| Some(r.country.code()))),
            float64_array(rows.iter().map(|r| r.cost_of_living_index)),
            float64_array(rows.iter().map(|r| r.rent_index)),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

/// Outer join of the macro and cost-of-living sources for one country
///
/// Any field may be missing when the country appears in only one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CountryEconomics {
    pub nominal_salary: Option<f64>,
    pub cost_of_living_index: Option<f64>,
    pub rent_index: Option<f64>,
}
