/// Error types for the towing tank analysis.
/// Author: G0rocks
/// Date: 2026-10-16

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading, aggregating or plotting towing tank data
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The run table does not exist at the given path
    #[error("input file {0} does not exist")]
    MissingInput(PathBuf),

    /// The run table was read but no usable (non-zero) rows were found
    #[error("no usable run records in {0}")]
    EmptyTable(PathBuf),

    /// A row could not be turned into a run record
    #[error("row {row}: {message}")]
    InvalidRow {
        /// 1-based row number in the input file
        row: usize,
        /// What was wrong with the row
        message: String,
    },

    /// Not enough points to compute the requested quantity
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The x values of a linear fit have no spread
    #[error("cannot fit a line through points with identical x values")]
    DegenerateFit,

    /// The configuration file could not be parsed
    #[error("invalid configuration {path}: {source}")]
    Config {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// Error from the csv reader or writer
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Error from the file system
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
