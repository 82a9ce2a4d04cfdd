//! Scraped job posting model
//!
//! A `JobPosting` is one row of the scraper output, kept as close to the raw
//! text as possible. Nothing here is trusted: the country code may be padded or
//! out of scope, the description length may not be a number, and any column of
//! the whitelist may be missing from the file altogether.

use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::common::traits::BatchAdapter;
use crate::error::Result;
use crate::schema::{Column, ColumnSet};
use crate::utils::arrow::{
    extract_float64_column, extract_string_column, float64_array, string_array,
};

/// One scraped job advertisement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    /// Country code as scraped
    pub country: Option<String>,
    /// Location text as scraped, e.g. `"Hybrid - Berlin"`
    pub raw_location: Option<String>,
    /// Modality label as scraped
    pub modality: Option<String>,
    /// Description length in characters; `None` when missing or not numeric
    pub desc_length: Option<f64>,
    pub url: Option<String>,
}

impl JobPosting {
    /// Whitelisted posting columns present in a batch
    #[must_use]
    pub fn present_columns(batch: &RecordBatch) -> ColumnSet {
        let schema = batch.schema();
        ColumnSet::from_names(schema.fields().iter().map(|f| f.name().as_str()))
            .restricted_to(&Column::POSTING_WHITELIST)
    }
}

impl BatchAdapter for JobPosting {
    fn schema() -> Schema {
        Schema::new(
            Column::POSTING_WHITELIST
                .iter()
                .map(|c| c.field())
                .collect::<Vec<_>>(),
        )
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let titles = extract_string_column(batch, Column::Title.name(), false)?;
        let companies = extract_string_column(batch, Column::Company.name(), false)?;
        let countries = extract_string_column(batch, Column::Country.name(), false)?;
        let locations = extract_string_column(batch, Column::RawLocation.name(), false)?;
        let modalities = extract_string_column(batch, Column::Modality.name(), false)?;
        let lengths = extract_float64_column(batch, Column::DescLength.name(), false)?;
        let urls = extract_string_column(batch, Column::Url.name(), false)?;

        let postings = titles
            .into_iter()
            .zip(companies)
            .zip(countries)
            .zip(locations)
            .zip(modalities)
            .zip(lengths)
            .zip(urls)
            .map(
                |((((((title, company), country), raw_location), modality), desc_length), url)| {
                    JobPosting {
                        title,
                        company,
                        country,
                        raw_location,
                        modality,
                        desc_length,
                        url,
                    }
                },
            )
            .collect();

        Ok(postings)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let columns = vec![
            string_array(rows.iter().map(|p| p.title.as_deref())),
            string_array(rows.iter().map(|p| p.company.as_deref())),
            string_array(rows.iter().map(|p| p.country.as_deref())),
            string_array(rows.iter().map(|p| p.raw_location.as_deref())),
            string_array(rows.iter().map(|p| p.modality.as_deref())),
            float64_array(rows.iter().map(|p| p.desc_length)),
            string_array(rows.iter().map(|p| p.url.as_deref())),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}
