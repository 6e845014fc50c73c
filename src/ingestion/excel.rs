#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, TimeDelta};

use crate::error::EngineResult;
use crate::processing::normalize::format_date_iso;
use crate::types::{Cell, RawGrid};

/// Read one sheet of a workbook (`.xlsx`, `.xls`, etc.) into a raw grid.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Keeps cell positions relative to column `A`, so column indexes match the sheet
/// - Skips rows with no non-empty cells
/// - Converts date/time cells to ISO text (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`)
///
/// A workbook without sheets yields an empty grid.
pub fn read_excel_grid_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> EngineResult<RawGrid> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => match workbook.sheet_names().first() {
            Some(first) => first.clone(),
            None => return Ok(Vec::new()),
        },
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(range_to_grid(&range))
}

fn range_to_grid(range: &calamine::Range<Data>) -> RawGrid {
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);

    range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| {
            let mut out: Vec<Cell> = Vec::with_capacity(col_offset + row.len());
            out.resize(col_offset, Cell::Empty);
            out.extend(row.iter().map(convert_cell));
            out
        })
        .collect()
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::DateTime(dt) if !dt.is_duration() => {
            excel_serial_to_text(dt.as_f64()).unwrap_or(Cell::Number(dt.as_f64()))
        }
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
        Data::Error(e) => Cell::text(e.to_string()),
    }
}

/// Excel stores date/times as days since 1899-12-30 (with a fractional day).
fn excel_serial_to_text(serial: f64) -> Option<Cell> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if !millis.is_finite() {
        return None;
    }
    let dt = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)?;
    Some(Cell::Text(format_date_iso(&dt)))
}

#[cfg(test)]
mod tests {
    use super::excel_serial_to_text;
    use crate::types::Cell;

    #[test]
    fn serials_convert_to_iso_text() {
        assert_eq!(excel_serial_to_text(45356.0), Some(Cell::from("2024-03-05")));
        assert_eq!(excel_serial_to_text(45356.5), Some(Cell::from("2024-03-05 12:00:00")));
    }
}
