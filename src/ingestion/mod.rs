//! Loading uploads into a [`crate::types::FileDataset`].
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - rejects uploads that are too large or of an unsupported type
//! - auto-detects the format by file extension (or you can override via [`LoadOptions`])
//! - parses the file into a raw grid and infers a type for every column
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - `excel` (requires the Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, TracingObserver,
};
pub use unified::{
    load_csv_from_reader, load_from_path, InputFormat, LoadOptions, SheetSelection,
    DEFAULT_MAX_FILE_SIZE,
};
