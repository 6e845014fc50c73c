use thiserror::Error;

/// Convenience result type for loading and export operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type returned by loading and export functions.
///
/// The pure processing functions never fail; every error here comes from the file boundary
/// (reading, validating, or writing bytes) or from an unsupported export format.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook reading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV reading or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX writing error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested export format is not one of `xlsx`, `csv`, `json`.
    #[error("unsupported export format '{format}'")]
    UnsupportedFormat { format: String },

    /// The input file exceeds the configured size limit.
    #[error("file '{name}' is {size} bytes; the limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The input file's type cannot be loaded.
    #[error("unsupported file type for '{name}': only .xlsx, .xls and .csv files are supported")]
    UnsupportedFileType { name: String },

    /// The input parsed to no rows at all.
    #[error("file '{name}' appears to be empty")]
    EmptyFile { name: String },
}
