//! Error types for the hwtp generator.
//!
//! This module provides a unified error type [`HwtpError`] for the conditions
//! that abort a generation run: unreadable workbooks, malformed configuration
//! and failed output writes. Per-row problems (unparsable cells, unresolved
//! references) are not errors; they are recorded in
//! [`Diagnostics`](crate::rules::Diagnostics) and the row is skipped.

use std::path::Path;

use thiserror::Error;

/// Result type alias using [`HwtpError`].
pub type Result<T> = std::result::Result<T, HwtpError>;

/// Unified error type for all generator operations.
#[derive(Error, Debug)]
pub enum HwtpError {
    // ============ Input Errors ============
    /// Error reading an input file (workbook, listing, config)
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Workbook JSON did not match the expected sheet/row shape
    #[error("Invalid workbook '{path}': {source}")]
    WorkbookFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error decoding a CSV sheet
    #[error("Failed to read CSV sheet '{path}': {source}")]
    CsvRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Workbook contains no sheets
    #[error("Workbook '{path}' contains no sheets")]
    EmptyWorkbook { path: String },

    // ============ Configuration Errors ============
    /// Error parsing the generator configuration file
    #[error("Invalid configuration '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured pointer pattern is not a valid regular expression
    #[error("Invalid pointer pattern '{pattern}': {source}")]
    InvalidPointerPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // ============ Output Errors ============
    /// Error creating an output directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a generated file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl HwtpError {
    /// Create a file read error
    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a file write error
    pub fn file_write(path: &Path, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a directory creation error
    pub fn create_dir(path: &Path, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a CSV read error
    pub fn csv_read(path: &Path, source: csv::Error) -> Self {
        Self::CsvRead {
            path: path.display().to_string(),
            source,
        }
    }
}
