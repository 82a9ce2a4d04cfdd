//! Cleaned posting model
//!
//! The types carry the quality invariants of the cleaning stage: salary and
//! cost index are always present, the country is one of the five codes and the
//! remote flag is a plain boolean.

use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::common::traits::BatchAdapter;
use crate::error::{PipelineError, Result};
use crate::models::{CONFIDENTIAL_COMPANY, Country, EnrichedPosting, Modality, UNKNOWN_CITY};
use crate::schema::{Column, ColumnSet};
use crate::utils::arrow::{
    boolean_array, extract_boolean_column, extract_float64_column, extract_string_column,
    float64_array, string_array,
};

/// One row of the cleaned table
#[derive(Debug, Clone, PartialEq)]
pub struct CleanPosting {
    pub title: String,
    pub company: String,
    pub country: Country,
    pub city: String,
    pub raw_location: Option<String>,
    pub nominal_salary: f64,
    pub cost_of_living_index: f64,
    pub rent_index: Option<f64>,
    pub adjusted_salary: f64,
    pub modality: Option<Modality>,
    pub remote: bool,
    pub desc_length: f64,
    pub url: Option<String>,
}

impl From<CleanPosting> for EnrichedPosting {
    fn from(row: CleanPosting) -> Self {
        EnrichedPosting {
            title: Some(row.title),
            company: Some(row.company),
            country: Some(row.country),
            city: Some(row.city),
            raw_location: row.raw_location,
            nominal_salary: Some(row.nominal_salary),
            cost_of_living_index: Some(row.cost_of_living_index),
            rent_index: row.rent_index,
            adjusted_salary: Some(row.adjusted_salary),
            modality: row.modality,
            remote: Some(row.remote),
            desc_length: Some(row.desc_length),
            url: row.url,
        }
    }
}

impl BatchAdapter for CleanPosting {
    fn schema() -> Schema {
        ColumnSet::all().schema()
    }

    /// Read a cleaned table back; rows breaking an invariant are rejected with an error
    ///
    /// Company, city and remote flag may be absent from files cleaned without
    /// location data and take their defaults.
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let titles = extract_string_column(batch, Column::Title.name(), true)?;
        let companies = extract_string_column(batch, Column::Company.name(), false)?;
        let countries = extract_string_column(batch, Column::Country.name(), true)?;
        let cities = extract_string_column(batch, Column::City.name(), false)?;
        let locations = extract_string_column(batch, Column::RawLocation.name(), false)?;
        let salaries = extract_float64_column(batch, Column::NominalSalary.name(), true)?;
        let costs = extract_float64_column(batch, Column::CostOfLivingIndex.name(), true)?;
        let rents = extract_float64_column(batch, Column::RentIndex.name(), false)?;
        let adjusted = extract_float64_column(batch, Column::AdjustedSalary.name(), true)?;
        let modalities = extract_string_column(batch, Column::Modality.name(), false)?;
        let remote = extract_boolean_column(batch, Column::Remote.name(), false)?;
        let lengths = extract_float64_column(batch, Column::DescLength.name(), true)?;
        let urls = extract_string_column(batch, Column::Url.name(), false)?;

        let invalid = |row: usize, column: Column| PipelineError::InvalidDataType {
            column: column.name().to_string(),
            expected: format!("a value in row {row} of a cleaned table"),
        };

        (0..batch.num_rows())
            .map(|i| {
                Ok(CleanPosting {
                    title: titles[i].clone().unwrap_or_default(),
                    company: companies[i]
                        .clone()
                        .unwrap_or_else(|| CONFIDENTIAL_COMPANY.to_string()),
                    country: countries[i]
                        .as_deref()
                        .and_then(Country::from_code)
                        .ok_or_else(|| invalid(i, Column::Country))?,
                    city: cities[i].clone().unwrap_or_else(|| UNKNOWN_CITY.to_string()),
                    raw_location: locations[i].clone(),
                    nominal_salary: salaries[i].ok_or_else(|| invalid(i, Column::NominalSalary))?,
                    cost_of_living_index: costs[i]
                        .ok_or_else(|| invalid(i, Column::CostOfLivingIndex))?,
                    rent_index: rents[i],
                    adjusted_salary: adjusted[i]
                        .ok_or_else(|| invalid(i, Column::AdjustedSalary))?,
                    modality: modalities[i].as_deref().and_then(Modality::from_label),
                    remote: remote[i].unwrap_or(false),
                    desc_length: lengths[i].ok_or_else(|| invalid(i, Column::DescLength))?,
                    url: urls[i].clone(),
                })
            })
            .collect()
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let columns = vec![
            string_array(rows.iter().map(|r| Some(r.title.as_str()))),
            string_array(rows.iter().map(|r| Some(r.company.as_str()))),
            string_array(rows.iter().map(|r| Some(r.country.code()))),
            string_array(rows.iter().map(|r| Some(r.city.as_str()))),
            string_array(rows.iter().map(|r| r.raw_location.as_deref())),
            float64_array(rows.iter().map(|r| Some(r.nominal_salary))),
            float64_array(rows.iter().map(|r| Some(r.cost_of_living_index))),
            float64_array(rows.iter().map(|r| r.rent_index)),
            float64_array(rows.iter().map(|r| Some(r.adjusted_salary))),
            string_array(rows.iter().map(|r| r.modality.map(Modality::label))),
            boolean_array(rows.iter().map(|r| Some(r.remote))),
            float64_array(rows.iter().map(|r| Some(r.desc_length))),
            string_array(rows.iter().map(|r| r.url.as_deref())),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}
