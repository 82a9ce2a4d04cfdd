//! End-to-end runs over a dataset directory

use std::path::Path;
use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::algorithm::cleaning::{CleaningReport, run_cleaning};
use crate::algorithm::integration::{
    IntegrationInputs, IntegrationReport, MacroSourceResolver, run_integration,
};
use crate::algorithm::statistics::DescriptiveSummary;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::CleanPosting;
use crate::reader::{CsvReadOptions, read_models};

/// Reports of both stages and the summary of the cleaned table
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub integration: IntegrationReport,
    pub cleaning: CleaningReport,
    pub summary: DescriptiveSummary,
}

/// Integrate then clean, reading and writing the configured file names
pub fn run_all(config: &PipelineConfig, macro_source: &dyn MacroSourceResolver) -> Result<PipelineReport> {
    let start = Instant::now();
    config.validate()?;

    let inputs = IntegrationInputs::from_config(config, macro_source);
    let merged_path = config.merged_path();
    let (_, integration) = run_integration(&inputs, config, &merged_path)?;

    let (cleaned, cleaning) = run_cleaning(&merged_path, &config.cleaned_path(), config)?;
    let summary = DescriptiveSummary::from_postings(&cleaned.rows);

    info!("Pipeline finished in {:?}", start.elapsed());
    Ok(PipelineReport {
        integration,
        cleaning,
        summary,
    })
}

/// Summarize a cleaned table written by an earlier run
pub fn describe(path: &Path, config: &PipelineConfig) -> Result<DescriptiveSummary> {
    let postings: Vec<CleanPosting> = read_models(path, &CsvReadOptions::new(config.output_delimiter))?;
    Ok(DescriptiveSummary::from_postings(&postings))
}
