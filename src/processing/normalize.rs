//! Value normalization and display formatting.
//!
//! [`normalize`] turns a raw [`Cell`] into the canonical typed value for its column, and
//! [`format_value`] renders a normalized value for display. Both are total: malformed input
//! degrades to a defined default instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{format_number, parse_number, Cell, ColumnType};

/// Display format for dates (`M/D/YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Lowercase tokens that normalize to `true` in a boolean column.
pub const TRUE_TOKENS: [&str; 4] = ["true", "yes", "1", "y"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

/// Canonical in-memory value of a cell under its column type.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    /// Empty input, whatever the column type.
    Empty,
    /// Boolean column value.
    Boolean(bool),
    /// Number column value (`0` for non-numeric input).
    Number(f64),
    /// Date column value; `None` when the input is not a recognizable date.
    Date(Option<NaiveDateTime>),
    /// Text column value.
    Text(String),
}

impl NormalizedValue {
    /// Whether the value counts as empty for filtering (empty input or an unparseable date).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty | Self::Date(None))
    }

    /// String form used by the text operators.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty | Self::Date(None) => String::new(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Date(Some(d)) => format_date_iso(d),
            Self::Text(s) => s.clone(),
        }
    }

    /// Numeric form used by the comparison operators; `NaN` when there is none.
    ///
    /// Dates compare as milliseconds since the Unix epoch.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Empty | Self::Date(None) => f64::NAN,
            Self::Boolean(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Date(Some(d)) => d.and_utc().timestamp_millis() as f64,
            Self::Text(s) => parse_number(s).unwrap_or(f64::NAN),
        }
    }

    /// Truthiness used by `is_true` / `is_false`.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Empty | Self::Date(None) => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Date(Some(_)) => true,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

/// Normalize a raw cell for a column of type `column_type`.
///
/// - empty input is always [`NormalizedValue::Empty`]
/// - `Boolean`: `true` iff the lowercase form is one of [`TRUE_TOKENS`]
/// - `Number`: numeric conversion, `0` when the input is not numeric
/// - `Date`: calendar parse, [`NormalizedValue::Date`]`(None)` when it fails
/// - `Text`: the cell's string form
pub fn normalize(value: &Cell, column_type: ColumnType) -> NormalizedValue {
    if value.is_empty() {
        return NormalizedValue::Empty;
    }

    match column_type {
        ColumnType::Boolean => {
            let lower = value.to_string().to_lowercase();
            NormalizedValue::Boolean(TRUE_TOKENS.contains(&lower.as_str()))
        }
        ColumnType::Number => {
            let n = value.to_number();
            NormalizedValue::Number(if n.is_nan() { 0.0 } else { n })
        }
        ColumnType::Date => NormalizedValue::Date(parse_date(value)),
        ColumnType::Text => NormalizedValue::Text(value.to_string()),
    }
}

/// Render a normalized value for display.
///
/// Booleans show as `Yes`/`No`, numbers in canonical decimal form, and dates as
/// [`DISPLAY_DATE_FORMAT`]. Values that do not match the column type fall back to their
/// string form.
pub fn format_value(value: &NormalizedValue, column_type: ColumnType) -> String {
    if value.is_empty() {
        return String::new();
    }

    match (column_type, value) {
        (ColumnType::Boolean, v) => (if v.truthy() { "Yes" } else { "No" }).to_string(),
        (ColumnType::Number, NormalizedValue::Number(n)) => format_number(*n),
        (ColumnType::Date, NormalizedValue::Date(Some(d))) => {
            d.format(DISPLAY_DATE_FORMAT).to_string()
        }
        (_, v) => v.to_text(),
    }
}

/// Parse a raw cell as a calendar date/time.
///
/// Numbers are read as milliseconds since the Unix epoch; text is tried against RFC 3339,
/// RFC 2822 and a set of common date and date-time layouts.
pub(crate) fn parse_date(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Number(n) if n.is_finite() => {
            DateTime::from_timestamp_millis(*n as i64).map(|d| d.naive_utc())
        }
        Cell::Text(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.naive_utc());
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.naive_utc());
    }
    if let Some(d) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// ISO form of a date-time: date only at midnight, otherwise date and time.
pub(crate) fn format_date_iso(d: &NaiveDateTime) -> String {
    if d.time() == chrono::NaiveTime::MIN {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_value, normalize, parse_date, NormalizedValue};
    use crate::types::{Cell, ColumnType};

    fn date(y: i32, m: u32, d: u32) -> NormalizedValue {
        NormalizedValue::Date(NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0)))
    }

    #[test]
    fn empty_input_is_empty_for_every_type() {
        for ty in [ColumnType::Text, ColumnType::Number, ColumnType::Boolean, ColumnType::Date] {
            assert_eq!(normalize(&Cell::Empty, ty), NormalizedValue::Empty);
            assert_eq!(normalize(&Cell::from(""), ty), NormalizedValue::Empty);
        }
    }

    #[test]
    fn boolean_normalization_accepts_true_tokens_only() {
        let yes = NormalizedValue::Boolean(true);
        let no = NormalizedValue::Boolean(false);
        for t in ["true", "YES", "1", "y"] {
            assert_eq!(normalize(&Cell::from(t), ColumnType::Boolean), yes);
        }
        for f in ["false", "no", "0", "n", "garbage"] {
            assert_eq!(normalize(&Cell::from(f), ColumnType::Boolean), no);
        }
        assert_eq!(normalize(&Cell::Boolean(true), ColumnType::Boolean), yes);
        assert_eq!(normalize(&Cell::Number(1.0), ColumnType::Boolean), yes);
    }

    #[test]
    fn non_numeric_input_normalizes_to_zero() {
        let number = |cell: Cell| normalize(&cell, ColumnType::Number);
        assert_eq!(number(Cell::from("abc")), NormalizedValue::Number(0.0));
        assert_eq!(number(Cell::from(" 12.5 ")), NormalizedValue::Number(12.5));
        assert_eq!(number(Cell::Number(7.0)), NormalizedValue::Number(7.0));
    }

    #[test]
    fn invalid_date_is_the_no_date_sentinel() {
        let v = normalize(&Cell::from("not a date"), ColumnType::Date);
        assert_eq!(v, NormalizedValue::Date(None));
        assert_ne!(v, NormalizedValue::Empty);
        assert!(v.is_empty());
    }

    #[test]
    fn common_date_layouts_parse() {
        assert_eq!(normalize(&Cell::from("2024-03-05"), ColumnType::Date), date(2024, 3, 5));
        assert_eq!(normalize(&Cell::from("3/5/2024"), ColumnType::Date), date(2024, 3, 5));
        assert_eq!(normalize(&Cell::from("Mar 5, 2024"), ColumnType::Date), date(2024, 3, 5));
        assert!(parse_date(&Cell::from("2024-03-05T10:15:00Z")).is_some());
        assert!(parse_date(&Cell::Number(0.0)).is_some());
        assert!(parse_date(&Cell::Boolean(true)).is_none());
    }

    #[test]
    fn text_keeps_the_string_form() {
        assert_eq!(
            normalize(&Cell::Number(30.0), ColumnType::Text),
            NormalizedValue::Text("30".to_string())
        );
        assert_eq!(
            normalize(&Cell::from("Ann"), ColumnType::Text),
            NormalizedValue::Text("Ann".to_string())
        );
    }

    #[test]
    fn format_value_renders_each_type() {
        assert_eq!(format_value(&NormalizedValue::Empty, ColumnType::Number), "");
        assert_eq!(format_value(&NormalizedValue::Boolean(true), ColumnType::Boolean), "Yes");
        assert_eq!(format_value(&NormalizedValue::Boolean(false), ColumnType::Boolean), "No");
        assert_eq!(format_value(&NormalizedValue::Number(1500.0), ColumnType::Number), "1500");
        assert_eq!(format_value(&NormalizedValue::Number(0.25), ColumnType::Number), "0.25");
        assert_eq!(format_value(&date(2024, 3, 5), ColumnType::Date), "3/5/2024");
        assert_eq!(format_value(&NormalizedValue::Date(None), ColumnType::Date), "");
        assert_eq!(format_value(&NormalizedValue::Text("x".into()), ColumnType::Text), "x");
    }

    #[test]
    fn format_value_falls_back_to_string_form_on_type_mismatch() {
        assert_eq!(format_value(&NormalizedValue::Text("n/a".into()), ColumnType::Number), "n/a");
        assert_eq!(format_value(&NormalizedValue::Number(4.0), ColumnType::Text), "4");
    }
}
