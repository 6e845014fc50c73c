//! `tabular-refine` loads a spreadsheet or CSV upload into an in-memory grid, infers a type for
//! every column, filters and projects the rows, and exports the result as XLSX, CSV, or JSON.
//!
//! The pipeline has three stages:
//!
//! 1. [`ingestion::load_from_path`] validates the upload and builds a [`types::FileDataset`]
//!    (raw grid plus column descriptors with inferred [`types::ColumnType`]s).
//! 2. [`processing::project`] applies a conjunction of [`types::FilterCondition`]s and keeps the
//!    selected columns, producing a [`types::ProcessedResult`].
//! 3. [`export::encode`] turns the result into an [`export::ExportArtifact`].
//!
//! ## What you can load
//!
//! - **CSV**: `.csv`
//! - **Workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`
//!
//! Row 0 of the grid is the header row. Blank headers become `Column N`.
//!
//! ## Column types
//!
//! Each column is classified from its first [`processing::DEFAULT_SAMPLE_SIZE`] non-empty values:
//!
//! - [`types::ColumnType::Boolean`] if more than 80% are boolean tokens (`true`, `yes`, `1`, ...)
//! - [`types::ColumnType::Number`] if more than 80% are numeric
//! - [`types::ColumnType::Date`] if more than 80% parse as dates
//! - [`types::ColumnType::Text`] otherwise
//!
//! ## Quick example: load, filter, export
//!
//! ```no_run
//! use tabular_refine::export::{encode, ExportFormat, ExportOptions};
//! use tabular_refine::ingestion::{load_from_path, LoadOptions};
//! use tabular_refine::processing::project;
//! use tabular_refine::types::{FilterCondition, FilterOperator};
//!
//! # fn main() -> Result<(), tabular_refine::EngineError> {
//! let ds = load_from_path("people.csv", &LoadOptions::default())?;
//! let conditions = [FilterCondition::new("1", "Age", FilterOperator::GreaterThan, "30")];
//! let result = project(&ds, &["Name", "City"], &conditions);
//!
//! let artifact = encode(
//!     &result,
//!     &ExportOptions {
//!         format: ExportFormat::Csv,
//!         ..Default::default()
//!     },
//! )?;
//! std::fs::write(&artifact.file_name, &artifact.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory example
//!
//! ```rust
//! use tabular_refine::export::{encode, ExportFormat, ExportOptions};
//! use tabular_refine::ingestion::{load_csv_from_reader, LoadOptions};
//! use tabular_refine::processing::project;
//! use tabular_refine::types::{ColumnType, FilterCondition, FilterOperator};
//!
//! let input = "Name,Age\nAnn,30\nBob,41\n";
//! let ds = load_csv_from_reader("people.csv", input.as_bytes(), &LoadOptions::default()).unwrap();
//! assert_eq!(ds.columns[1].column_type, ColumnType::Number);
//!
//! let conditions = [FilterCondition::new("1", "Age", FilterOperator::GreaterThan, "35")];
//! let result = project(&ds, &["Name"], &conditions);
//! assert_eq!(result.filtered_count, 1);
//!
//! let options = ExportOptions {
//!     file_name: "adults".to_string(),
//!     format: ExportFormat::Csv,
//!     include_headers: true,
//! };
//! let artifact = encode(&result, &options).unwrap();
//! assert_eq!(artifact.file_name, "adults.csv");
//! assert_eq!(artifact.bytes, b"Name\nBob\n");
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: upload validation, CSV/workbook readers, load observers
//! - [`types`]: cells, grids, column descriptors, filter conditions, results
//! - [`processing`]: type inference, normalization, filtering and projection
//! - [`export`]: XLSX/CSV/JSON encoders
//! - [`error`]: error types used across loading and export

pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{EngineError, EngineResult};
