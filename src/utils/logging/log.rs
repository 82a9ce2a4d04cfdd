//! Logging utilities
//!
//! This module provides standardized logging functions for stage operations.

use std::path::Path;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory that was operated on
/// * `rows` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows from {} in {:?}",
            operation,
            rows,
            path.display(),
            duration
        );
    } else {
        log::info!("Successfully {} {} rows from {}", operation, rows, path.display());
    }
}

/// Log a count of rows removed by a rule, skipping rules that removed nothing
pub fn log_rows_removed(rule: &str, removed: usize) {
    if removed > 0 {
        log::info!("Removed {removed} rows: {rule}");
    } else {
        log::debug!("No rows removed: {rule}");
    }
}
