//! Cleaning stage
//!
//! Turns the merged table into the analysis-ready one. Rows are filtered in a
//! fixed order (missing economics, non-positive cost index, invalid country,
//! short descriptions), the description length is winsorized on the survivors,
//! text fields are tidied and the adjusted salary is recomputed.

pub mod filters;
pub mod outliers;

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::algorithm::location::{LocationNormalizer, title_case};
use crate::algorithm::salary::adjusted_salary;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{CleanPosting, EnrichedPosting, PostingTable, UNKNOWN_CITY};
use crate::reader::{CsvReadOptions, read_csv};
use crate::schema::{Column, ColumnSet};
use crate::utils::logging::log_rows_removed;
use crate::writer::{CsvWriteOptions, write_csv};

pub use filters::{
    drop_invalid_country, drop_missing_economics, drop_non_positive_cost_index,
    drop_short_descriptions, fill_placeholders,
};
pub use outliers::UpperFence;

/// Columns the cleaning stage cannot run without
pub const REQUIRED_COLUMNS: [Column; 4] = [
    Column::NominalSalary,
    Column::CostOfLivingIndex,
    Column::DescLength,
    Column::Country,
];

/// What the cleaning stage did, for logs and the optional JSON report
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub generated_at: DateTime<Utc>,
    pub input_rows: usize,
    pub missing_economics: usize,
    pub non_positive_cost_index: usize,
    pub invalid_country: usize,
    pub short_descriptions: usize,
    pub fence: Option<UpperFence>,
    pub capped_descriptions: usize,
    /// Smallest description length left after the quality filter
    pub min_desc_length_after_filter: Option<f64>,
    pub output_rows: usize,
    pub columns: Vec<&'static str>,
}

/// Cleaned rows and the columns to write them with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    pub columns: ColumnSet,
    pub rows: Vec<CleanPosting>,
}

impl CleanTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Table in the merged layout, ready to be written
    #[must_use]
    pub fn to_posting_table(&self) -> PostingTable {
        PostingTable::new(
            self.columns.clone(),
            self.rows.iter().cloned().map(EnrichedPosting::from).collect(),
        )
    }
}

/// Output columns: those of the input plus the fields this stage always fills
fn output_columns(input: &ColumnSet) -> ColumnSet {
    let mut columns = input.clone();
    columns.insert(Column::Title);
    columns.insert(Column::Company);
    columns.insert(Column::AdjustedSalary);
    if input.contains(Column::RawLocation) {
        columns.insert(Column::City);
    }
    columns
}

/// Clean a merged table in memory
///
/// # Errors
/// Fails when one of [`REQUIRED_COLUMNS`] is absent or a pattern does not compile
pub fn clean(table: PostingTable, config: &PipelineConfig) -> Result<(CleanTable, CleaningReport)> {
    table.require_columns(&REQUIRED_COLUMNS)?;

    let mut report = CleaningReport {
        generated_at: Utc::now(),
        input_rows: table.len(),
        ..CleaningReport::default()
    };
    let columns = output_columns(&table.columns);
    let has_location = table.columns.contains(Column::RawLocation);
    let mut rows = table.rows;

    report.missing_economics = drop_missing_economics(&mut rows);
    log_rows_removed("missing salary or cost-of-living index", report.missing_economics);

    fill_placeholders(&mut rows);

    report.non_positive_cost_index = drop_non_positive_cost_index(&mut rows);
    log_rows_removed("cost-of-living index not positive", report.non_positive_cost_index);

    report.invalid_country = drop_invalid_country(&mut rows);
    log_rows_removed("country outside the vocabulary", report.invalid_country);

    report.short_descriptions = drop_short_descriptions(&mut rows, config.min_desc_length);
    info!(
        "Removed {} rows with descriptions shorter than {} characters",
        report.short_descriptions, config.min_desc_length
    );

    let lengths: Vec<f64> = rows.iter().filter_map(|r| r.desc_length).collect();
    report.min_desc_length_after_filter = lengths.iter().copied().reduce(f64::min);
    if let Some(min) = report.min_desc_length_after_filter {
        info!("Shortest remaining description: {min}");
    }

    report.fence = UpperFence::from_values(&lengths, config.iqr_multiplier);
    if let Some(fence) = &report.fence {
        report.capped_descriptions = fence.clamp(rows.iter_mut().filter_map(|r| r.desc_length.as_mut()));
        info!(
            "Description length capped at {:.2} (Q1 {:.2}, Q3 {:.2}); {} rows capped",
            fence.upper_bound, fence.q1, fence.q3, report.capped_descriptions
        );
    }

    let normalizer = LocationNormalizer::for_cleaning()?;
    let cleaned: Vec<CleanPosting> = rows
        .into_iter()
        .filter_map(|row| finish_row(row, has_location, &normalizer))
        .collect();

    if cleaned.len() != report.input_rows - report.removed() {
        warn!(
            "{} rows lost required fields during conversion",
            report.input_rows - report.removed() - cleaned.len()
        );
    }

    report.output_rows = cleaned.len();
    report.columns = columns.names();
    Ok((
        CleanTable {
            columns,
            rows: cleaned,
        },
        report,
    ))
}

impl CleaningReport {
    /// Rows removed by the filters
    #[must_use]
    pub fn removed(&self) -> usize {
        self.missing_economics + self.non_positive_cost_index + self.invalid_country + self.short_descriptions
    }
}

/// Tidy text fields, recompute the salary and convert to the strict row type
fn finish_row(row: EnrichedPosting, has_location: bool, normalizer: &LocationNormalizer) -> Option<CleanPosting> {
    let nominal_salary = row.nominal_salary?;
    let cost_of_living_index = row.cost_of_living_index?;

    let city = if has_location {
        normalizer.normalize(row.raw_location.as_deref())
    } else {
        row.city.unwrap_or_else(|| UNKNOWN_CITY.to_string())
    };

    Some(CleanPosting {
        title: title_case(row.title.unwrap_or_default().trim()),
        company: row.company.unwrap_or_default(),
        country: row.country?,
        city,
        raw_location: row.raw_location,
        nominal_salary,
        cost_of_living_index,
        rent_index: row.rent_index,
        adjusted_salary: adjusted_salary(Some(nominal_salary), Some(cost_of_living_index))?,
        modality: row.modality,
        remote: row.remote.unwrap_or(false),
        desc_length: row.desc_length?,
        url: row.url,
    })
}

/// Read the merged table at `input`, clean it and write the result to `output`
pub fn run_cleaning(input: &Path, output: &Path, config: &PipelineConfig) -> Result<(CleanTable, CleaningReport)> {
    let batch = read_csv(input, &CsvReadOptions::new(config.output_delimiter))?;
    let table = PostingTable::from_record_batch(&batch)?;

    let (cleaned, report) = clean(table, config)?;

    let batch = cleaned.to_posting_table().to_record_batch()?;
    write_csv(output, &batch, &CsvWriteOptions::from_config(config))?;

    info!("Clean table written to {}: {} rows", output.display(), report.output_rows);
    Ok((cleaned, report))
}
