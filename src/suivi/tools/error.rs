use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that can occur while the tool reads the
/// tracking workbook, reshapes it, or writes the normalised copy.
///
/// Data-level oddities (unparseable dates, unknown initials, junk rows) are
/// not errors; they are absorbed during normalisation and counted in the
/// conversion report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a roster file or report cannot be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the source workbook carries none of the expected sheets.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the source workbook already uses the normalised layout.
    #[error("workbook {0} is already normalised")]
    AlreadyNormalized(PathBuf),

    /// Raised when a roster definition is inconsistent.
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the output path would clobber the source workbook.
    #[error("output path {0} is the same as the input")]
    OutputOverwritesInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
