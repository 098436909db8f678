//! Error types for the XLSX export kernel.

use thiserror::Error;

/// Result alias used across `framekit_io_xlsx`.
pub type XlsxWriteResult<T> = Result<T, XlsxWriteError>;

/// Failures raised while resolving formats or writing a workbook.
#[derive(Debug, Error)]
pub enum XlsxWriteError {
    /// Logical format name is not part of the format catalog.
    #[error(
        "unknown format name {name:?}; expected one of: monetary, percentage, date, integer, float, text"
    )]
    UnknownFormat {
        /// Offending logical name.
        name: String,
    },

    /// Caller-provided arguments are malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Sheet would not fit in one Excel worksheet.
    #[error("Excel limit exceeded: {0}")]
    ExceedsExcelLimit(String),

    /// Write attempted after [`crate::writer::XlsxWriter::close`].
    #[error("cannot write after close()")]
    WriterClosed,

    /// Failure reading values out of the source frame.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Failure reported by the workbook writer, including save errors.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Filesystem failure around the destination path.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
