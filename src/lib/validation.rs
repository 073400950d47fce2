//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters
//! and file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`] to provide
//! rich contextual information when validation fails.

use crate::errors::{Result, SeedgrowError};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input FASTQ")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use seedgrow_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/reads.fq", "Input FASTQ");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(SeedgrowError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that `max_val >= min_val`
///
/// # Errors
/// Returns an error if max < min
///
/// # Example
/// ```
/// use seedgrow_lib::validation::validate_min_max;
///
/// validate_min_max(18, 36, "min-length", "max-length").unwrap();
/// validate_min_max(18, 18, "min-length", "max-length").unwrap();
///
/// let result = validate_min_max(20, 18, "min-length", "max-length");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_min_max<T: Ord + Display>(
    min_val: T,
    max_val: T,
    min_name: &str,
    max_name: &str,
) -> Result<()> {
    if max_val < min_val {
        return Err(SeedgrowError::InvalidParameter {
            parameter: max_name.to_string(),
            reason: format!("{max_name} ({max_val}) must be >= {min_name} ({min_val})"),
        });
    }
    Ok(())
}

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use seedgrow_lib::validation::validate_positive;
///
/// validate_positive(18, "min-length").unwrap();
///
/// let result = validate_positive(0, "min-length");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(SeedgrowError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}
