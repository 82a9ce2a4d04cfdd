//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting and converting
//! columns from record batches read off delimited files.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::error::{PipelineError, Result};

/// Get a column from a record batch, cast to the expected type when needed
///
/// # Arguments
///
/// * `batch` - The record batch containing the column
/// * `column_name` - The name of the column to extract
/// * `expected_type` - The expected data type for the column
/// * `required` - Whether the column is required (error if missing) or optional (None if missing)
///
/// # Returns
///
/// * `Ok(Some(ArrayRef))` - The column array (converted if necessary) if found
/// * `Ok(None)` - If the column is not found and `required` is false
/// * `Err(PipelineError)` - If the column is not found and `required` is true, or if the cast fails
pub fn get_column(
    batch: &RecordBatch,
    column_name: &str,
    expected_type: &DataType,
    required: bool,
) -> Result<Option<ArrayRef>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(PipelineError::column_not_found(column_name));
        }
        debug!("Column '{column_name}' not found in record batch");
        return Ok(None);
    };

    let column = batch.column(idx);
    let actual_type = column.data_type();

    if actual_type == expected_type {
        return Ok(Some(column.clone()));
    }

    debug!("Converting column '{column_name}' from {actual_type:?} to {expected_type:?}");
    match cast(column, expected_type) {
        Ok(converted) => Ok(Some(converted)),
        Err(err) => {
            warn!("Failed to convert column '{column_name}' to {expected_type:?}: {err}");
            Err(PipelineError::InvalidDataType {
                column: column_name.to_string(),
                expected: format!("{expected_type:?}"),
            })
        }
    }
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| PipelineError::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Whether the batch carries a column with this name
#[must_use]
pub fn has_column(batch: &RecordBatch, column_name: &str) -> bool {
    batch.schema().index_of(column_name).is_ok()
}

/// Return the first of `candidates` present in the batch
#[must_use]
pub fn first_present_column<'a>(batch: &RecordBatch, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|name| has_column(batch, name))
}
