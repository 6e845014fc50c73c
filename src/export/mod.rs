//! Export encoding.
//!
//! [`encode`] serializes a [`ProcessedResult`] into an in-memory [`ExportArtifact`]. Writing the
//! artifact anywhere is left to the caller.
//!
//! Format-specific encoders are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`xlsx`]
//!
//! ## Example
//!
//! ```rust
//! use tabular_refine::export::{encode, ExportFormat, ExportOptions};
//! use tabular_refine::types::{Cell, ProcessedResult};
//!
//! # fn main() -> Result<(), tabular_refine::EngineError> {
//! let result = ProcessedResult {
//!     headers: vec!["Name".to_string(), "Age".to_string()],
//!     rows: vec![vec![Cell::from("Ann"), Cell::from("30")]],
//!     total_count: 1,
//!     filtered_count: 1,
//!     source_columns: Vec::new(),
//! };
//! let options = ExportOptions {
//!     file_name: "people".to_string(),
//!     format: "csv".parse::<ExportFormat>()?,
//!     include_headers: true,
//! };
//!
//! let artifact = encode(&result, &options)?;
//! assert_eq!(artifact.file_name, "people.csv");
//! assert_eq!(artifact.bytes, b"Name,Age\nAnn,30\n");
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod json;
pub mod xlsx;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::types::ProcessedResult;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExportFormat {
    /// Single-sheet Office Open XML workbook.
    Xlsx,
    /// Comma-separated values.
    Csv,
    /// JSON array of objects keyed by header.
    Json,
}

impl ExportFormat {
    /// File extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// MIME type of the encoded artifact.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv;charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(EngineError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ExportFormat> for String {
    fn from(format: ExportFormat) -> Self {
        format.extension().to_string()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options controlling [`encode`].
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Base name of the artifact; the format's extension is appended.
    pub file_name: String,
    /// Output format.
    pub format: ExportFormat,
    /// Whether to emit the header row (ignored by JSON, whose keys always come from headers).
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: "filtered_data".to_string(),
            format: ExportFormat::Xlsx,
            include_headers: true,
        }
    }
}

/// An encoded export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name including extension.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Encoded content.
    pub bytes: Vec<u8>,
}

/// Encode a processed result in the requested format.
pub fn encode(result: &ProcessedResult, options: &ExportOptions) -> EngineResult<ExportArtifact> {
    let bytes = match options.format {
        ExportFormat::Xlsx => xlsx::encode_xlsx(result, options.include_headers)?,
        ExportFormat::Csv => csv::encode_csv(result, options.include_headers)?,
        ExportFormat::Json => json::encode_json(result)?,
    };

    let file_name = format!("{}.{}", options.file_name, options.format.extension());
    info!(
        file = %file_name,
        format = %options.format,
        rows = result.row_count(),
        bytes = bytes.len(),
        "encoded export"
    );

    Ok(ExportArtifact {
        file_name,
        mime_type: options.format.mime_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::{encode, ExportFormat, ExportOptions};
    use crate::error::EngineError;
    use crate::types::{Cell, ProcessedResult};

    fn sample() -> ProcessedResult {
        ProcessedResult {
            headers: vec!["Name".to_string(), "Age".to_string()],
            rows: vec![vec![Cell::from("Ann"), Cell::from("30")]],
            total_count: 1,
            filtered_count: 1,
            source_columns: Vec::new(),
        }
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!(" json ".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat { ref format } if format == "pdf"));
        assert!(err.to_string().contains("unsupported export format 'pdf'"));
    }

    #[test]
    fn options_deserialize_and_reject_unknown_formats() {
        let opts: ExportOptions =
            serde_json::from_str(r#"{"fileName":"out","format":"csv","includeHeaders":false}"#)
                .unwrap();
        assert_eq!(opts.format, ExportFormat::Csv);
        assert!(!opts.include_headers);

        let err = serde_json::from_str::<ExportOptions>(
            r#"{"fileName":"out","format":"ods","includeHeaders":true}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported export format"));
    }

    #[test]
    fn artifact_name_and_mime_follow_format() {
        let opts = ExportOptions {
            format: ExportFormat::Json,
            ..Default::default()
        };
        let artifact = encode(&sample(), &opts).unwrap();
        assert_eq!(artifact.file_name, "filtered_data.json");
        assert_eq!(artifact.mime_type, "application/json");
        assert!(!artifact.bytes.is_empty());
    }

    #[test]
    fn xlsx_artifact_is_a_zip_container() {
        let artifact = encode(&sample(), &ExportOptions::default()).unwrap();
        assert_eq!(artifact.file_name, "filtered_data.xlsx");
        assert_eq!(&artifact.bytes[..2], b"PK");
    }

    #[test]
    fn json_ignores_include_headers() {
        let encode_json = |include_headers| {
            let opts = ExportOptions {
                file_name: "people".to_string(),
                format: ExportFormat::Json,
                include_headers,
            };
            encode(&sample(), &opts).unwrap().bytes
        };

        let with_headers = encode_json(true);
        assert_eq!(with_headers, encode_json(false));

        let parsed: serde_json::Value = serde_json::from_slice(&with_headers).unwrap();
        assert_eq!(parsed, serde_json::json!([{"Name": "Ann", "Age": "30"}]));
    }
}
