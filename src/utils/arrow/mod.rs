//! Arrow data handling utilities
//!
//! Helpers for column lookup, casting and typed extraction from record batches.

pub mod array_utils;
pub mod builders;
pub mod extractors;

// Re-export commonly used functions for convenience
pub use array_utils::{downcast_array, first_present_column, get_column, has_column};
pub use builders::{boolean_array, float64_array, string_array};
pub use extractors::{
    extract_boolean_column, extract_float64_column, extract_string_column, parse_bool,
    parse_float,
};
