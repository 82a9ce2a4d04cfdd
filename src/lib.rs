//! A Rust library for building and cleaning a job-market dataset.
//!
//! Scraped job postings are joined with per-country salary and cost-of-living
//! figures, then filtered and normalized into an analysis-ready table. Tables
//! are read and written as delimited text through Arrow record batches.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod utils;
pub mod writer;

// Re-export the most common types for easier use
// Core types
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use models::{CleanPosting, Country, EnrichedPosting, JobPosting, Modality, PostingTable};
pub use schema::{Column, ColumnSet};

// Stages
pub use algorithm::cleaning::{CleanTable, CleaningReport, clean, run_cleaning};
pub use algorithm::integration::{
    DirectoryScanResolver, FixedPathResolver, IntegrationInputs, IntegrationReport,
    MacroSourceResolver, integrate, run_integration,
};
pub use algorithm::statistics::DescriptiveSummary;
pub use pipeline::{PipelineReport, describe, run_all};

// Arrow types
pub use arrow::record_batch::RecordBatch;
