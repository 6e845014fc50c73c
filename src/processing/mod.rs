//! The transformation engine.
//!
//! Everything here is a pure, synchronous computation over an in-memory
//! [`crate::types::FileDataset`]:
//!
//! - [`infer_type()`]: classify a column from a sample of raw values
//! - [`normalize()`] / [`format_value()`]: raw cell to typed value, typed value to display text
//! - [`matches()`]: evaluate one filter condition against a normalized value
//! - [`project()`]: filter conjunction plus column projection into a
//!   [`crate::types::ProcessedResult`]
//!
//! None of these functions fail. Malformed cells coerce to defaults and references to unknown
//! columns are ignored.
//!
//! ## Example: infer → filter → project
//!
//! ```rust
//! use tabular_refine::processing::{project, DEFAULT_SAMPLE_SIZE};
//! use tabular_refine::types::{Cell, ColumnType, FileDataset, FilterCondition, FilterOperator};
//!
//! let grid = vec![
//!     vec![Cell::from("A"), Cell::from("B")],
//!     vec![Cell::from("x"), Cell::from("yes")],
//!     vec![Cell::from("y"), Cell::from("no")],
//! ];
//! let ds = FileDataset::from_grid("data.csv", grid, DEFAULT_SAMPLE_SIZE);
//! assert_eq!(ds.columns[1].column_type, ColumnType::Boolean);
//!
//! let conditions = [FilterCondition::new("1", "B", FilterOperator::IsTrue, "")];
//! let out = project(&ds, &["B", "A"], &conditions);
//! assert_eq!(out.headers, vec!["B", "A"]);
//! assert_eq!(out.rows, vec![vec![Cell::from("yes"), Cell::from("x")]]);
//! ```

pub mod filter;
pub mod infer;
pub mod normalize;
pub mod project;

pub use filter::matches;
pub use infer::{infer_type, BOOLEAN_TOKENS, DEFAULT_SAMPLE_SIZE, TYPE_MAJORITY_PERCENT};
pub use normalize::{format_value, normalize, NormalizedValue, DISPLAY_DATE_FORMAT, TRUE_TOKENS};
pub use project::project;
