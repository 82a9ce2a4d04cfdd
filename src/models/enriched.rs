//! Postings joined with their country's economic indicators
//!
//! This is the row type of the merged table written by the integration stage
//! and read back by the cleaning stage. A [`PostingTable`] pairs the rows with
//! the set of columns the table actually carries, since columns absent from the
//! scraped input are omitted from the output rather than written empty.

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use log::warn;

use crate::error::{PipelineError, Result};
use crate::models::{Country, Modality};
use crate::schema::{Column, ColumnSet};
use crate::utils::arrow::{
    boolean_array, extract_boolean_column, extract_float64_column, extract_string_column,
    float64_array, string_array,
};

/// A posting with country economics and derived fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub country: Option<Country>,
    pub city: Option<String>,
    pub raw_location: Option<String>,
    pub nominal_salary: Option<f64>,
    pub cost_of_living_index: Option<f64>,
    pub rent_index: Option<f64>,
    pub adjusted_salary: Option<f64>,
    pub modality: Option<Modality>,
    pub remote: Option<bool>,
    pub desc_length: Option<f64>,
    pub url: Option<String>,
}

/// Rows of the merged table together with the columns it carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingTable {
    pub columns: ColumnSet,
    pub rows: Vec<EnrichedPosting>,
}

impl PostingTable {
    #[must_use]
    pub fn new(columns: ColumnSet, rows: Vec<EnrichedPosting>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fail with the first of `required` the table does not carry
    pub fn require_columns(&self, required: &[Column]) -> Result<()> {
        match required.iter().find(|c| !self.columns.contains(**c)) {
            Some(missing) => Err(PipelineError::column_not_found(missing.name())),
            None => Ok(()),
        }
    }

    /// Read a merged table; columns outside the output layout are ignored
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let columns = ColumnSet::from_names(schema.fields().iter().map(|f| f.name().as_str()));

        let titles = extract_string_column(batch, Column::Title.name(), false)?;
        let companies = extract_string_column(batch, Column::Company.name(), false)?;
        let countries = extract_string_column(batch, Column::Country.name(), false)?;
        let cities = extract_string_column(batch, Column::City.name(), false)?;
        let locations = extract_string_column(batch, Column::RawLocation.name(), false)?;
        let salaries = extract_float64_column(batch, Column::NominalSalary.name(), false)?;
        let costs = extract_float64_column(batch, Column::CostOfLivingIndex.name(), false)?;
        let rents = extract_float64_column(batch, Column::RentIndex.name(), false)?;
        let adjusted = extract_float64_column(batch, Column::AdjustedSalary.name(), false)?;
        let modalities = extract_string_column(batch, Column::Modality.name(), false)?;
        let remote = extract_boolean_column(batch, Column::Remote.name(), false)?;
        let lengths = extract_float64_column(batch, Column::DescLength.name(), false)?;
        let urls = extract_string_column(batch, Column::Url.name(), false)?;

        let mut unknown_modalities = 0usize;
        let rows = (0..batch.num_rows())
            .map(|i| EnrichedPosting {
                title: titles[i].clone(),
                company: companies[i].clone(),
                country: countries[i].as_deref().and_then(Country::from_code),
                city: cities[i].clone(),
                raw_location: locations[i].clone(),
                nominal_salary: salaries[i],
                cost_of_living_index: costs[i],
                rent_index: rents[i],
                adjusted_salary: adjusted[i],
                modality: modalities[i].as_deref().and_then(|label| {
                    let parsed = Modality::from_label(label);
                    if parsed.is_none() {
                        unknown_modalities += 1;
                    }
                    parsed
                }),
                remote: remote[i],
                desc_length: lengths[i],
                url: urls[i].clone(),
            })
            .collect();

        if unknown_modalities > 0 {
            warn!("{unknown_modalities} rows carry an unrecognised modality label; treated as missing");
        }

        Ok(Self { columns, rows })
    }

    /// Build a record batch holding only the carried columns, in output order
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let rows = &self.rows;
        let arrays = self
            .columns
            .iter()
            .map(|column| match column {
                Column::Title => string_array(rows.iter().map(|r| r.title.as_deref())),
                Column::Company => string_array(rows.iter().map(|r| r.company.as_deref())),
                Column::Country => string_array(rows.iter().map(|r| r.country.map(Country::code))),
                Column::City => string_array(rows.iter().map(|r| r.city.as_deref())),
                Column::RawLocation => {
                    string_array(rows.iter().map(|r| r.raw_location.as_deref()))
                }
                Column::NominalSalary => float64_array(rows.iter().map(|r| r.nominal_salary)),
                Column::CostOfLivingIndex => {
                    float64_array(rows.iter().map(|r| r.cost_of_living_index))
                }
                Column::RentIndex => float64_array(rows.iter().map(|r| r.rent_index)),
                Column::AdjustedSalary => float64_array(rows.iter().map(|r| r.adjusted_salary)),
                Column::Modality => string_array(rows.iter().map(|r| r.modality.map(Modality::label))),
                Column::Remote => boolean_array(rows.iter().map(|r| r.remote)),
                Column::DescLength => float64_array(rows.iter().map(|r| r.desc_length)),
                Column::Url => string_array(rows.iter().map(|r| r.url.as_deref())),
            })
            .collect::<Vec<_>>();

        Ok(RecordBatch::try_new(
            Arc::new(self.columns.schema()),
            arrays,
        )?)
    }
}
