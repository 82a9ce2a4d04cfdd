//! Configuration for the integration and cleaning stages.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Environment variable overriding the dataset directory
pub const DATASET_DIR_ENV: &str = "JOBMARKET_DATASET_DIR";
/// Environment variable overriding the minimum description length
pub const MIN_DESC_LENGTH_ENV: &str = "JOBMARKET_MIN_DESC_LENGTH";

/// Configuration shared by both pipeline stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding every input and output file
    pub dataset_dir: PathBuf,
    /// File name of the scraped postings table
    pub postings_file: String,
    /// Delimiter of the scraped postings table
    pub postings_delimiter: u8,
    /// Token a macro source file name must contain
    pub macro_marker: String,
    /// Extension a macro source file must have
    pub macro_extension: String,
    /// Delimiter of the macro source
    pub macro_delimiter: u8,
    /// File name of the curated cost-of-living table
    pub cost_of_living_file: String,
    /// Delimiter of the curated cost-of-living table
    pub cost_of_living_delimiter: u8,
    /// File name of the Integrator output
    pub merged_file: String,
    /// File name of the Cleaner output
    pub cleaned_file: String,
    /// Delimiter used for both stage outputs
    pub output_delimiter: u8,
    /// Prefix outputs with a UTF-8 byte-order mark
    pub write_bom: bool,
    /// Descriptions shorter than this are scraping failures
    pub min_desc_length: f64,
    /// Multiplier applied to the IQR for the upper winsorization bound
    pub iqr_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            postings_file: "indeed_global_final.csv".to_string(),
            postings_delimiter: b',',
            macro_marker: "OECD".to_string(),
            macro_extension: "csv".to_string(),
            macro_delimiter: b',',
            cost_of_living_file: "datos_numbeo_manual.csv".to_string(),
            cost_of_living_delimiter: b';',
            merged_file: "Global Data Analyst Job Market 2025.csv".to_string(),
            cleaned_file: "Global Data Analyst Job Market_Clean.csv".to_string(),
            output_delimiter: b';',
            write_bom: true,
            min_desc_length: 20.0,
            iqr_multiplier: 1.5,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(DATASET_DIR_ENV) {
            config.dataset_dir = PathBuf::from(dir);
        }

        if let Some(min) = std::env::var(MIN_DESC_LENGTH_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
        {
            config.min_desc_length = min;
        }

        config
    }

    /// Same configuration rooted at another dataset directory
    #[must_use]
    pub fn with_dataset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dataset_dir = dir.into();
        self
    }

    /// Reject values no stage can work with
    pub fn validate(&self) -> Result<()> {
        if !self.min_desc_length.is_finite() || self.min_desc_length < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "min_desc_length must be a non-negative number, got {}",
                self.min_desc_length
            )));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "iqr_multiplier must be a non-negative number, got {}",
                self.iqr_multiplier
            )));
        }
        if self.macro_marker.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "macro_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn postings_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.postings_file)
    }

    #[must_use]
    pub fn cost_of_living_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.cost_of_living_file)
    }

    #[must_use]
    pub fn merged_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.merged_file)
    }

    #[must_use]
    pub fn cleaned_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.cleaned_file)
    }

    #[must_use]
    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Dataset Directory: {}", self.dataset_dir.display())?;
        writeln!(f, "  Postings File: {}", self.postings_file)?;
        writeln!(
            f,
            "  Macro Source: *{}*.{}",
            self.macro_marker, self.macro_extension
        )?;
        writeln!(f, "  Cost-of-Living File: {}", self.cost_of_living_file)?;
        writeln!(f, "  Merged Output: {}", self.merged_file)?;
        writeln!(f, "  Cleaned Output: {}", self.cleaned_file)?;
        writeln!(f, "  Minimum Description Length: {}", self.min_desc_length)?;
        writeln!(f, "  IQR Multiplier: {}", self.iqr_multiplier)?;
        Ok(())
    }
}
