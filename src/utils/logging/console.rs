//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use std::path::Path;
use std::time::Duration;

/// Print where a stage wrote its table, how many rows and which columns
pub fn print_table_summary(path: &Path, rows: usize, columns: &[&str], elapsed: Duration) {
    println!("Wrote {} in {:?}", path.display(), elapsed);
    println!("Total rows: {rows}");
    println!("Columns:");
    for column in columns {
        println!("  - {column}");
    }
}
