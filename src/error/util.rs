//! Utility functions for error handling
//!
//! File helpers that attach the path and the purpose of an access to any IO failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(PipelineError::file(
            path,
            format!("File not found, needed for: {purpose}"),
            io::Error::from(io::ErrorKind::NotFound),
        ));
    }

    if !path.is_file() {
        return Err(PipelineError::file(
            path,
            format!("Path is not a file, expected a file for: {purpose}"),
            io::Error::from(io::ErrorKind::InvalidInput),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        PipelineError::file(path, context, e)
    })
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    match io::Read::read_to_string(&mut file, &mut content) {
        Ok(_) => Ok(content),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file content for: {purpose}"),
            };
            Err(PipelineError::file(path, context, e))
        }
    }
}

/// Create (or truncate) a file for writing, creating missing parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::file(parent, format!("Failed to create directory for: {purpose}"), e)
            })?;
        }
    }

    fs::File::create(path)
        .map_err(|e| PipelineError::file(path, format!("Failed to create file for: {purpose}"), e))
}

/// Check that a directory exists and can be listed
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(PipelineError::file(
            path,
            format!("Directory not found, needed for: {purpose}"),
            io::Error::from(io::ErrorKind::NotFound),
        ));
    }

    fs::read_dir(path)
        .map(|_| ())
        .map_err(|e| PipelineError::file(path, format!("Failed to access directory for: {purpose}"), e))
}
