//! Loading of the three integration inputs
//!
//! The postings table is mandatory and any failure reading it is returned as an
//! error, though single rows with the wrong number of fields are skipped and
//! counted. The two economic sources are optional: a problem with either one is
//! logged, recorded in the report and replaced by an empty or fallback table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{info, warn};

use super::{CostOfLivingSource, IntegrationReport};
use crate::common::traits::BatchAdapter;
use crate::error::util::validate_directory;
use crate::error::{PipelineError, Result};
use crate::models::{CostOfLivingRecord, Country, JobPosting, MacroRecord};
use crate::reader::{CsvReadOptions, read_csv, read_csv_lenient};
use crate::schema::ColumnSet;
use crate::utils::arrow::{extract_float64_column, extract_string_column, first_present_column};

/// Country-code columns accepted in the macro source, in order of preference
pub const MACRO_COUNTRY_COLUMNS: [&str; 2] = ["REF_AREA", "LOCATION"];
/// Value columns accepted in the macro source, in order of preference
pub const MACRO_VALUE_COLUMNS: [&str; 2] = ["OBS_VALUE", "Value"];

/// Locates the macro-economic source file
pub trait MacroSourceResolver {
    /// Path of the source, or `None` when no candidate exists
    fn resolve(&self) -> Result<Option<PathBuf>>;
}

/// Picks the first file, by name, in a directory whose name contains a marker
#[derive(Debug, Clone)]
pub struct DirectoryScanResolver {
    pub dir: PathBuf,
    pub marker: String,
    pub extension: String,
}

impl DirectoryScanResolver {
    pub fn new(dir: impl Into<PathBuf>, marker: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            marker: marker.into(),
            extension: extension.into(),
        }
    }
}

impl MacroSourceResolver for DirectoryScanResolver {
    fn resolve(&self) -> Result<Option<PathBuf>> {
        validate_directory(&self.dir, "macro source lookup")?;

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| PipelineError::file(&self.dir, "Failed to list dataset directory", e))?;

        let found = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().is_some_and(|ext| ext == self.extension.as_str())
                    && path
                        .file_name()
                        .is_some_and(|name| name.to_string_lossy().contains(&self.marker))
            })
            .sorted()
            .next();

        Ok(found)
    }
}

/// Always resolves to the same path
#[derive(Debug, Clone)]
pub struct FixedPathResolver(pub PathBuf);

impl MacroSourceResolver for FixedPathResolver {
    fn resolve(&self) -> Result<Option<PathBuf>> {
        Ok(Some(self.0.clone()))
    }
}

/// Read the postings table, keeping only whitelisted columns
///
/// Returns the rows and the whitelisted columns the file actually carries.
/// Rows whose field count differs from the header are dropped and counted in
/// `report.malformed_postings`.
pub fn load_postings(
    path: &Path,
    delimiter: u8,
    report: &mut IntegrationReport,
) -> Result<(Vec<JobPosting>, ColumnSet)> {
    let (batch, malformed) = read_csv_lenient(path, &CsvReadOptions::new(delimiter))?;
    if malformed > 0 {
        let message = format!("Skipped {malformed} malformed lines in {}", path.display());
        warn!("{message}");
        report.warnings.push(message);
    }
    report.malformed_postings = malformed;

    let columns = JobPosting::present_columns(&batch);
    let postings = JobPosting::from_record_batch(&batch)?;
    info!(
        "Postings loaded: {} rows, columns {:?}",
        postings.len(),
        columns.names()
    );
    Ok((postings, columns))
}

/// Per-country macro figures and the number of rows outside the vocabulary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTable {
    pub records: Vec<MacroRecord>,
    pub out_of_scope_rows: usize,
}

/// Mean of the usable values per country
///
/// Rows whose code is not one of the five macro codes are counted and dropped.
/// A country whose values are all unusable keeps a record with no salary.
#[must_use]
pub fn aggregate_macro_rows(rows: impl IntoIterator<Item = (Option<String>, Option<f64>)>) -> MacroTable {
    let mut values: BTreeMap<Country, Vec<f64>> = BTreeMap::new();
    let mut out_of_scope_rows = 0;

    for (code, value) in rows {
        match code.as_deref().and_then(Country::from_macro_code) {
            Some(country) => values.entry(country).or_default().extend(value),
            None => out_of_scope_rows += 1,
        }
    }

    let records = values
        .into_iter()
        .map(|(country, values)| MacroRecord {
            country,
            nominal_salary: crate::algorithm::statistics::mean(&values),
        })
        .collect();

    MacroTable {
        records,
        out_of_scope_rows,
    }
}

fn try_load_macro(resolver: &dyn MacroSourceResolver, delimiter: u8) -> Result<(PathBuf, MacroTable)> {
    let path = resolver
        .resolve()?
        .ok_or_else(|| PipelineError::Source("no macro source file found".to_string()))?;

    let batch = read_csv(&path, &CsvReadOptions::new(delimiter))?;

    let country_column = first_present_column(&batch, &MACRO_COUNTRY_COLUMNS).ok_or_else(|| {
        PipelineError::Source(format!(
            "macro source has no country column ({})",
            MACRO_COUNTRY_COLUMNS.join(" or ")
        ))
    })?;
    let value_column = first_present_column(&batch, &MACRO_VALUE_COLUMNS).ok_or_else(|| {
        PipelineError::Source(format!(
            "macro source has no value column ({})",
            MACRO_VALUE_COLUMNS.join(" or ")
        ))
    })?;

    let codes = extract_string_column(&batch, country_column, true)?;
    let values = extract_float64_column(&batch, value_column, true)?;

    Ok((path, aggregate_macro_rows(codes.into_iter().zip(values))))
}

/// Load the macro source; any failure degrades to an empty table with a warning
pub fn load_macro_records(
    resolver: &dyn MacroSourceResolver,
    delimiter: u8,
    report: &mut IntegrationReport,
) -> Vec<MacroRecord> {
    match try_load_macro(resolver, delimiter) {
        Ok((path, table)) => {
            let countries = table.records.iter().map(|r| r.country).collect_vec();
            info!(
                "Macro source {} processed. Countries: {}",
                path.display(),
                countries.iter().join(", ")
            );
            if table.out_of_scope_rows > 0 {
                info!(
                    "Dropped {} macro rows outside the country vocabulary",
                    table.out_of_scope_rows
                );
            }
            report.macro_source = Some(path);
            report.macro_countries = countries;
            report.macro_rows_out_of_scope = table.out_of_scope_rows;
            table.records
        }
        Err(e) => {
            let message = format!("Macro source unusable ({e}); salary data will be missing");
            warn!("{message}");
            report.warnings.push(message);
            Vec::new()
        }
    }
}

/// Load the curated cost-of-living table, or the fallback table
///
/// A missing file silently selects the fallback. A file that exists but cannot
/// be read also selects it, with a warning.
pub fn load_cost_of_living(path: &Path, delimiter: u8, report: &mut IntegrationReport) -> Vec<CostOfLivingRecord> {
    if !path.exists() {
        info!(
            "No cost-of-living file at {}; using the built-in table",
            path.display()
        );
        report.cost_of_living_source = CostOfLivingSource::Fallback;
        return CostOfLivingRecord::fallback_table();
    }

    let options = CsvReadOptions::new(delimiter).with_strip_quotes(true);
    match read_csv(path, &options).and_then(|batch| CostOfLivingRecord::from_record_batch(&batch)) {
        Ok(records) => {
            report.cost_of_living_source = CostOfLivingSource::File(path.to_path_buf());
            records
        }
        Err(e) => {
            let message = format!(
                "Cost-of-living file {} unusable ({e}); using the built-in table",
                path.display()
            );
            warn!("{message}");
            report.warnings.push(message);
            report.cost_of_living_source = CostOfLivingSource::Fallback;
            CostOfLivingRecord::fallback_table()
        }
    }
}
