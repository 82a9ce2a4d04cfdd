//! Module for writing record batches as delimited text.
//!
//! Stage outputs are semicolon separated and start with a UTF-8 byte-order
//! mark so spreadsheet tools pick the right encoding for accented text.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;

use crate::config::PipelineConfig;
use crate::error::util::safe_create_file;
use crate::error::{PipelineError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// UTF-8 encoding of the byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for writing one delimited table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub bom: bool,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            bom: true,
        }
    }
}

impl CsvWriteOptions {
    /// Output options of both stages
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            delimiter: config.output_delimiter,
            bom: config.write_bom,
        }
    }
}

/// Write a batch with a header row to any writer and hand the writer back
pub fn write_csv_to<W: Write>(mut writer: W, batch: &RecordBatch, options: &CsvWriteOptions) -> Result<W> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(options.delimiter)
        .build(writer);
    csv.write(batch)?;

    let mut writer = csv.into_inner();
    writer.flush()?;
    Ok(writer)
}

/// Write a batch to `path`, replacing any existing file
pub fn write_csv(path: &Path, batch: &RecordBatch, options: &CsvWriteOptions) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing", path);

    let file = safe_create_file(path, "write delimited table")?;
    write_csv_to(BufWriter::new(file), batch, options).map_err(|e| match e {
        PipelineError::Io(source) => PipelineError::file(path, "Failed to write output", source),
        other => other,
    })?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
