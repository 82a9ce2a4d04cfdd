//! Integration stage
//!
//! Builds the merged table: scraped postings left-joined onto per-country
//! economics assembled from a macro salary source and a cost-of-living table.
//! Only a failure to read the postings stops the stage; the economic sources
//! degrade to empty or fallback data with a warning.

pub mod merge;
pub mod sources;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::algorithm::location::LocationNormalizer;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Country, PostingTable};
use crate::writer::{CsvWriteOptions, write_csv};

pub use merge::{build_economic_table, enrich_postings, output_columns};
pub use sources::{
    DirectoryScanResolver, FixedPathResolver, MacroSourceResolver, MacroTable,
    aggregate_macro_rows, load_cost_of_living, load_macro_records, load_postings,
};

/// Where the cost-of-living indices came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostOfLivingSource {
    File(PathBuf),
    #[default]
    Fallback,
}

/// What the integration stage did, for logs and the optional JSON report
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationReport {
    pub generated_at: DateTime<Utc>,
    /// Well-formed posting rows read
    pub postings_read: usize,
    /// Posting lines skipped for having the wrong number of fields
    pub malformed_postings: usize,
    /// Postings dropped because their country is missing or not one of the five
    pub out_of_scope_postings: usize,
    pub postings_without_economics: usize,
    pub remote_postings: usize,
    pub macro_source: Option<PathBuf>,
    pub macro_countries: Vec<Country>,
    pub macro_rows_out_of_scope: usize,
    pub cost_of_living_source: CostOfLivingSource,
    pub output_rows: usize,
    pub columns: Vec<&'static str>,
    pub warnings: Vec<String>,
}

/// Input locations of the integration stage
pub struct IntegrationInputs<'a> {
    pub postings: PathBuf,
    pub macro_source: &'a dyn MacroSourceResolver,
    pub cost_of_living: PathBuf,
}

impl<'a> IntegrationInputs<'a> {
    /// Inputs at their configured names inside the dataset directory
    pub fn from_config(config: &PipelineConfig, macro_source: &'a dyn MacroSourceResolver) -> Self {
        Self {
            postings: config.postings_path(),
            macro_source,
            cost_of_living: config.cost_of_living_path(),
        }
    }
}

/// Resolver scanning the configured dataset directory
#[must_use]
pub fn default_macro_resolver(config: &PipelineConfig) -> DirectoryScanResolver {
    DirectoryScanResolver::new(
        config.dataset_dir(),
        config.macro_marker.as_str(),
        config.macro_extension.as_str(),
    )
}

/// Build the merged table in memory
///
/// # Errors
/// Fails only when the postings table cannot be read as a whole or a pattern
/// does not compile
pub fn integrate(inputs: &IntegrationInputs<'_>, config: &PipelineConfig) -> Result<(PostingTable, IntegrationReport)> {
    let mut report = IntegrationReport {
        generated_at: Utc::now(),
        ..IntegrationReport::default()
    };

    let (postings, posting_columns) = load_postings(&inputs.postings, config.postings_delimiter, &mut report)?;
    report.postings_read = postings.len();

    let macro_records = load_macro_records(inputs.macro_source, config.macro_delimiter, &mut report);
    let cost_of_living = load_cost_of_living(
        &inputs.cost_of_living,
        config.cost_of_living_delimiter,
        &mut report,
    );
    let economics = build_economic_table(&macro_records, &cost_of_living);

    let normalizer = LocationNormalizer::for_integration()?;
    let table = enrich_postings(postings, &posting_columns, &economics, &normalizer, &mut report);

    report.output_rows = table.len();
    report.columns = table.columns.names();
    Ok((table, report))
}

/// Build the merged table and write it to `output`
pub fn run_integration(
    inputs: &IntegrationInputs<'_>,
    config: &PipelineConfig,
    output: &Path,
) -> Result<(PostingTable, IntegrationReport)> {
    let (table, report) = integrate(inputs, config)?;

    let batch = table.to_record_batch()?;
    write_csv(output, &batch, &CsvWriteOptions::from_config(config))?;

    info!("Merged table written to {}", output.display());
    info!("Columns included: {:?}", report.columns);
    info!("Total rows: {}", report.output_rows);
    Ok((table, report))
}
