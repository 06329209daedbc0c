// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{DriverError, Result};
use crate::models::ToolFlags;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref PROFILE_NAME: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("PROFILE_NAME regex is valid");

    static ref EXTENSION: Regex =
        Regex::new(r"^[A-Za-z0-9]+$").expect("EXTENSION regex is valid");

    // Twitter usernames
    static ref AUTHOR_HANDLE: Regex =
        Regex::new(r"^\w+$").expect("AUTHOR_HANDLE regex is valid");
}

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            DriverError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(DriverError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(DriverError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(DriverError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_profile_name(name: &str) -> Result<()> {
        if !PROFILE_NAME.is_match(name) {
            return Err(DriverError::Validation(format!(
                "Invalid profile name: '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Labels prefix a file name, so they may not introduce path components.
    pub fn validate_label(label: &str) -> Result<()> {
        if label.contains(['/', '\\']) || label.contains(char::is_whitespace) || label == ".." {
            return Err(DriverError::Validation(format!(
                "Invalid output label: '{}'",
                label
            )));
        }
        Ok(())
    }

    pub fn validate_extension(extension: &str) -> Result<()> {
        if !EXTENSION.is_match(extension) {
            return Err(DriverError::Validation(format!(
                "Extension must be alphanumeric without a leading dot: '{}'",
                extension
            )));
        }
        Ok(())
    }

    pub fn validate_flags(flags: &ToolFlags) -> Result<()> {
        if let Some(threshold) = flags.p_threshold
            && !(threshold.is_finite() && threshold >= 0.0)
        {
            return Err(DriverError::Validation(format!(
                "p_threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        if let Some(weight) = flags.min_weight
            && !(weight.is_finite() && weight >= 0.0)
        {
            return Err(DriverError::Validation(format!(
                "min_weight must be a non-negative number, got {}",
                weight
            )));
        }

        for author in &flags.exclude_authors {
            if !AUTHOR_HANDLE.is_match(author) {
                return Err(DriverError::Validation(format!(
                    "Invalid excluded author: '{}'",
                    author
                )));
            }
        }

        Ok(())
    }
}
