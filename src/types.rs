//! Core data model types.
//!
//! A loaded file becomes a [`FileDataset`]: the raw, untyped [`RawGrid`] plus one inferred
//! [`Column`] per header cell. Filtering and projection read the dataset and produce a fresh
//! [`ProcessedResult`]; they never mutate it.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::processing::infer_type;

/// Number of values retained in [`Column::sample_values`] for display.
pub const DISPLAY_SAMPLE_LEN: usize = 5;

/// A single raw cell value as delivered by the parse boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing/empty cell.
    #[default]
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
    /// Boolean cell.
    Boolean(bool),
}

impl Cell {
    /// Build a text cell, mapping the empty string to [`Cell::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Self::Empty } else { Self::Text(s) }
    }

    /// Returns `true` for [`Cell::Empty`] and for empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric conversion of the cell.
    ///
    /// Booleans convert to `1`/`0`; text is trimmed and parsed; anything non-numeric yields `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Empty => f64::NAN,
            Self::Number(n) => *n,
            Self::Boolean(b) => f64::from(u8::from(*b)),
            Self::Text(s) => parse_number(s).unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

// Empty cells travel as `""` so JSON consumers see the same value the exporters write.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl Visitor<'_> for CellVisitor {
            type Value = Cell;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean, or null")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Cell, E> {
                Ok(Cell::Boolean(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cell, E> {
                Ok(Cell::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cell, E> {
                Ok(Cell::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cell, E> {
                Ok(Cell::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Cell, E> {
                Ok(Cell::text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Cell, E> {
                Ok(Cell::Empty)
            }

            fn visit_none<E: de::Error>(self) -> Result<Cell, E> {
                Ok(Cell::Empty)
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}

/// Parse a trimmed decimal literal, returning `None` for blank or non-finite input.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Canonical decimal form of a number: integral values print without a fraction.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Rectangular (logically) grid of raw cells. Row 0 is the header row.
pub type RawGrid = Vec<Vec<Cell>>;

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text (the fallback).
    Text,
    /// Numeric values.
    Number,
    /// Boolean tokens (`true`/`false`/`yes`/`no`/`1`/`0`/`y`/`n`).
    Boolean,
    /// Calendar dates / timestamps.
    Date,
}

impl ColumnType {
    /// Lowercase name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column of a loaded file.
///
/// `index` is the column's position in every [`RawGrid`] row and its only stable identity;
/// names may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Display name (header text, or `Column N` for a blank header).
    pub name: String,
    /// Inferred type, fixed for the column's lifetime.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Zero-based position in grid rows.
    pub index: usize,
    /// First few sampled values, for display.
    pub sample_values: Vec<Cell>,
}

/// An immutable loaded file: raw grid plus inferred columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDataset {
    /// Name of the source file.
    pub file_name: String,
    /// Number of data rows (excluding the header row).
    pub total_rows: usize,
    /// Number of header cells.
    pub total_columns: usize,
    /// Raw grid; row 0 is the header row.
    pub raw_grid: RawGrid,
    /// One column per header cell, in grid order.
    pub columns: Vec<Column>,
}

impl FileDataset {
    /// Build a dataset from a parsed grid, inferring each column's type from the first
    /// `sample_size` values of that column.
    ///
    /// Short data rows are tolerated: missing trailing cells are treated as empty.
    pub fn from_grid(file_name: impl Into<String>, raw_grid: RawGrid, sample_size: usize) -> Self {
        let header_len = raw_grid.first().map_or(0, Vec::len);
        let data_rows = raw_grid.get(1..).unwrap_or_default();
        let total_rows = data_rows.len();

        let columns = (0..header_len)
            .map(|index| {
                let sample: Vec<Cell> = data_rows
                    .iter()
                    .take(sample_size)
                    .map(|row| row.get(index).cloned().unwrap_or_default())
                    .collect();
                let header = &raw_grid[0][index];
                let name = if header.is_empty() {
                    format!("Column {}", index + 1)
                } else {
                    header.to_string()
                };

                Column {
                    name,
                    column_type: infer_type(&sample),
                    index,
                    sample_values: sample.into_iter().take(DISPLAY_SAMPLE_LEN).collect(),
                }
            })
            .collect();

        Self {
            file_name: file_name.into(),
            total_rows,
            total_columns: header_len,
            raw_grid,
            columns,
        }
    }

    /// The header row (empty if the grid is empty).
    pub fn header_row(&self) -> &[Cell] {
        self.raw_grid.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Data rows (everything after the header row).
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.raw_grid.get(1..).unwrap_or_default()
    }

    /// Returns the first column named `name`, if any.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the index of the first column named `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.column(name).map(|c| c.index)
    }
}

/// Filter operators.
///
/// Operators travel as snake_case strings. Strings that name no known operator are kept as
/// [`FilterOperator::Unknown`], which matches every row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    IsTrue,
    IsFalse,
    IsEmpty,
    IsNotEmpty,
    /// An operator this engine does not recognize.
    Unknown(String),
}

impl FilterOperator {
    /// Wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterEqual => "greater_equal",
            Self::LessEqual => "less_equal",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::Unknown(name) => name,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::Equals => "Equals",
            Self::NotEquals => "Not equals",
            Self::Contains => "Contains",
            Self::NotContains => "Not contains",
            Self::StartsWith => "Starts with",
            Self::EndsWith => "Ends with",
            Self::GreaterThan => "Greater than",
            Self::LessThan => "Less than",
            Self::GreaterEqual => "Greater or equal",
            Self::LessEqual => "Less or equal",
            Self::IsTrue => "Is true",
            Self::IsFalse => "Is false",
            Self::IsEmpty => "Is empty",
            Self::IsNotEmpty => "Is not empty",
            Self::Unknown(name) => name,
        }
    }

    /// Whether the operator reads [`FilterCondition::value`].
    pub fn takes_value(&self) -> bool {
        !matches!(
            self,
            Self::IsTrue | Self::IsFalse | Self::IsEmpty | Self::IsNotEmpty
        )
    }

    /// Operators offered for a column of the given type.
    pub fn for_column_type(column_type: ColumnType) -> Vec<Self> {
        let mut ops = vec![Self::Equals, Self::NotEquals, Self::IsEmpty, Self::IsNotEmpty];
        match column_type {
            ColumnType::Text => ops.extend([
                Self::Contains,
                Self::NotContains,
                Self::StartsWith,
                Self::EndsWith,
            ]),
            ColumnType::Number => ops.extend([
                Self::GreaterThan,
                Self::LessThan,
                Self::GreaterEqual,
                Self::LessEqual,
            ]),
            ColumnType::Boolean => ops.extend([Self::IsTrue, Self::IsFalse]),
            ColumnType::Date => {}
        }
        ops
    }
}

impl From<&str> for FilterOperator {
    fn from(s: &str) -> Self {
        match s {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "greater_equal" => Self::GreaterEqual,
            "less_equal" => Self::LessEqual,
            "is_true" => Self::IsTrue,
            "is_false" => Self::IsFalse,
            "is_empty" => Self::IsEmpty,
            "is_not_empty" => Self::IsNotEmpty,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for FilterOperator {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        match op {
            FilterOperator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row-filtering condition. A list of conditions is AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Opaque identity token (UI identity/removal only).
    pub id: String,
    /// Name of the column the condition reads.
    pub field: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Literal operand, always carried as a string.
    pub value: String,
}

impl FilterCondition {
    /// Create a new condition.
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<FilterOperator>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A projected, filtered view of a [`FileDataset`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    /// Header text for each projected column, in selection order.
    pub headers: Vec<String>,
    /// Projected raw cells of every kept row, in source order.
    pub rows: Vec<Vec<Cell>>,
    /// Data-row count of the source dataset.
    pub total_count: usize,
    /// Rows that satisfied every condition (independent of projection).
    pub filtered_count: usize,
    /// Source column index of each projected column, parallel to `headers`.
    #[serde(skip)]
    pub source_columns: Vec<usize>,
}

impl ProcessedResult {
    /// Number of projected rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
