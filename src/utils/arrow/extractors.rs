//! Field extraction utilities for Arrow record batches
//!
//! Input files are read with every column as text, so these helpers pull a whole
//! column out as typed Rust values and apply the same lenient parsing rules no
//! matter which file the column came from. A missing optional column yields a
//! vector of `None`s the length of the batch.

use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::arrow::array_utils::{downcast_array, get_column};

/// Extract a text column
///
/// Values are returned as written; empty cells become `None`.
pub fn extract_string_column(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Vec<Option<String>>> {
    let Some(array) = get_column(batch, column_name, &DataType::Utf8, required)? else {
        return Ok(vec![None; batch.num_rows()]);
    };
    let strings = downcast_array::<StringArray>(&array, column_name, "String")?;

    Ok((0..strings.len())
        .map(|row| {
            if strings.is_null(row) {
                return None;
            }
            let value = strings.value(row);
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect())
}

/// Extract a numeric column, treating unparsable text as missing
pub fn extract_float64_column(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Vec<Option<f64>>> {
    Ok(extract_string_column(batch, column_name, required)?
        .into_iter()
        .map(|value| value.as_deref().and_then(parse_float))
        .collect())
}

/// Extract a boolean column, treating unrecognised text as missing
pub fn extract_boolean_column(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Vec<Option<bool>>> {
    Ok(extract_string_column(batch, column_name, required)?
        .into_iter()
        .map(|value| value.as_deref().and_then(parse_bool))
        .collect())
}

/// Parse a finite number; `NaN`, infinities and garbage are missing values
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse the boolean spellings written by Arrow, pandas and spreadsheets
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "1.0" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "0.0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("desc_longitud", DataType::Utf8, true),
            Field::new("es_teletrabajo", DataType::Utf8, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some(" 120 "), Some("n/a"), None, Some("NaN")])),
                Arc::new(StringArray::from(vec![Some("True"), Some("false"), Some(""), Some("maybe")])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_float_column_is_lenient() {
        let values = extract_float64_column(&batch(), "desc_longitud", true).unwrap();
        assert_eq!(values, vec![Some(120.0), None, None, None]);
    }

    #[test]
    fn test_boolean_column() {
        let values = extract_boolean_column(&batch(), "es_teletrabajo", true).unwrap();
        assert_eq!(values, vec![Some(true), Some(false), None, None]);
    }

    #[test]
    fn test_missing_optional_column_is_all_none() {
        let values = extract_string_column(&batch(), "url", false).unwrap();
        assert_eq!(values, vec![None, None, None, None]);
    }
}
