use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Error type covering the failures that can occur while reading a Shopify
/// export or writing the aggregated product records.
///
/// The aggregation itself is infallible; every variant here belongs to the
/// readers, the writers, or the command line surface around them.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the CSV reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a cell cannot be decoded with the selected encoding.
    #[error("invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// Raised when a workbook has no usable sheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the header row lacks a column the aggregator groups by.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when no format was given and none can be inferred from the path.
    #[error("cannot infer file format from {0}")]
    UnknownFormat(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
