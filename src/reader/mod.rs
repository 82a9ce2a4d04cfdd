//! Module for reading delimited tables into Arrow record batches.
//!
//! Every column is read as text. Typed interpretation happens later, in the
//! model adapters, so a malformed cell degrades to a missing value instead of
//! failing the whole file. The lenient readers go one step further and skip
//! rows whose field count does not match the header.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, StringBuilder};
use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use log::warn;

use crate::common::traits::BatchAdapter;
use crate::error::util::safe_read_to_string;
use crate::error::{PipelineError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Byte-order mark some spreadsheet tools put in front of the header
pub const BOM: char = '\u{feff}';

/// Rows sampled when discovering the header
const SCHEMA_INFERENCE_ROWS: usize = 16;

/// Options for reading one delimited table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvReadOptions {
    pub delimiter: u8,
    /// Remove every `"` before parsing, for hand-curated files with stray quotes
    pub strip_quotes: bool,
    pub batch_size: usize,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            strip_quotes: false,
            batch_size: 8192,
        }
    }
}

impl CsvReadOptions {
    #[must_use]
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strip_quotes(mut self, strip_quotes: bool) -> Self {
        self.strip_quotes = strip_quotes;
        self
    }
}

/// Read a delimited file with a header row
///
/// # Errors
/// Fails when the file cannot be opened, has no header or cannot be parsed
pub fn read_csv(path: &Path, options: &CsvReadOptions) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading", path);

    let content = safe_read_to_string(path, "read delimited table")?;
    let batch = read_csv_from_str(&content, options)?;

    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Content with the byte-order mark removed and, if asked, every quote stripped
fn prepare<'a>(content: &'a str, options: &CsvReadOptions) -> Result<Cow<'a, str>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let content: Cow<'_, str> = if options.strip_quotes {
        Cow::Owned(content.replace('"', ""))
    } else {
        Cow::Borrowed(content)
    };

    if content.trim().is_empty() {
        return Err(PipelineError::Source(
            "table is empty, expected a header row".to_string(),
        ));
    }
    Ok(content)
}

/// All-text schema with trimmed header names
fn text_schema<'a>(names: impl IntoIterator<Item = &'a str>) -> Arc<Schema> {
    Arc::new(Schema::new(
        names
            .into_iter()
            .map(|name| Field::new(name.trim(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// Parse delimited text with a header row into a single batch of Utf8 columns
pub fn read_csv_from_str(content: &str, options: &CsvReadOptions) -> Result<RecordBatch> {
    let content = prepare(content, options)?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(options.delimiter);
    let (inferred, _) = format.infer_schema(
        Cursor::new(content.as_bytes()),
        Some(SCHEMA_INFERENCE_ROWS),
    )?;

    // Only the header names are kept; all cells are read as text
    let schema = text_schema(inferred.fields().iter().map(|f| f.name().as_str()));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_delimiter(options.delimiter)
        .with_batch_size(options.batch_size)
        .build(Cursor::new(content.as_bytes()))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Read a delimited file, skipping rows with the wrong number of fields
///
/// Returns the batch and the number of rows skipped.
///
/// # Errors
/// Fails when the file cannot be opened, has no header or is not valid text
pub fn read_csv_lenient(path: &Path, options: &CsvReadOptions) -> Result<(RecordBatch, usize)> {
    let start = Instant::now();
    log_operation_start("Reading", path);

    let content = safe_read_to_string(path, "read delimited table")?;
    let (batch, skipped) = read_csv_lenient_from_str(&content, options)?;

    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok((batch, skipped))
}

/// Parse delimited text like [`read_csv_from_str`], but drop each data row
/// whose field count differs from the header with a warning
pub fn read_csv_lenient_from_str(content: &str, options: &CsvReadOptions) -> Result<(RecordBatch, usize)> {
    let content = prepare(content, options)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let schema = text_schema(headers.iter());
    let mut builders: Vec<StringBuilder> = headers.iter().map(|_| StringBuilder::new()).collect();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        if record.len() != headers.len() {
            let line = record.position().map_or(0, csv::Position::line);
            warn!(
                "Skipping line {line}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
            skipped += 1;
            continue;
        }
        for (builder, field) in builders.iter_mut().zip(record.iter()) {
            // Empty cells are missing values, as in the Arrow reader
            if field.is_empty() {
                builder.append_null();
            } else {
                builder.append_value(field);
            }
        }
    }

    let columns: Vec<ArrayRef> = builders
        .into_iter()
        .map(|mut builder| Arc::new(builder.finish()) as ArrayRef)
        .collect();
    Ok((RecordBatch::try_new(schema, columns)?, skipped))
}

/// Read a file straight into model rows
pub fn read_models<T: BatchAdapter>(path: &Path, options: &CsvReadOptions) -> Result<Vec<T>> {
    let batch = read_csv(path, options)?;
    T::from_record_batch(&batch)
}
