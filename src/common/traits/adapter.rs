//! Record batch adapter trait
//!
//! Models cross file boundaries as Arrow record batches. This trait is the one
//! place a model describes its columns and how to move between rows and batches.

use crate::error::Result;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

/// Conversion between a model type and Arrow record batches
pub trait BatchAdapter: Sized {
    /// Arrow schema used when writing rows of this model
    fn schema() -> Schema;

    /// Convert a `RecordBatch` read from a file into model objects
    ///
    /// Columns may arrive as text; implementations parse them leniently and
    /// leave unparsable cells empty.
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>>;

    /// Convert model objects into a `RecordBatch` with [`BatchAdapter::schema`]
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch>;
}
