//! XLSX export.

use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};

use crate::error::EngineResult;
use crate::types::{format_number, Cell, ProcessedResult};

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Filtered Data";

/// Upper bound on a column's width, in character units.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Encode a result as a single-sheet workbook.
///
/// The header row (if `include_headers`) is followed by the data rows. Each column is sized to
/// its longest value plus two characters of padding, capped at [`MAX_COLUMN_WIDTH`].
pub fn encode_xlsx(result: &ProcessedResult, include_headers: bool) -> EngineResult<Vec<u8>> {
    let header_row: Vec<Cell> = result.headers.iter().map(|h| Cell::text(h.as_str())).collect();

    let mut table: Vec<&[Cell]> = Vec::with_capacity(result.rows.len() + 1);
    if include_headers {
        table.push(&header_row);
    }
    table.extend(result.rows.iter().map(Vec::as_slice));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (r, row) in table.iter().enumerate() {
        let r = row_num(r)?;
        for (c, cell) in row.iter().enumerate() {
            write_cell(worksheet, r, col_num(c)?, cell)?;
        }
    }

    for (c, width) in column_widths(&table, result.headers.len()).into_iter().enumerate() {
        worksheet.set_column_width(col_num(c)?, width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Width of each column: longest string form plus two, capped at [`MAX_COLUMN_WIDTH`].
pub fn column_widths(table: &[&[Cell]], columns: usize) -> Vec<usize> {
    (0..columns)
        .map(|c| {
            let longest = table
                .iter()
                .map(|row| row.get(c).map_or(0, |cell| cell.to_string().chars().count()))
                .max()
                .unwrap_or(0);
            (longest + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn write_cell(ws: &mut Worksheet, row: RowNum, col: ColNum, cell: &Cell) -> Result<(), XlsxError> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        Cell::Number(n) if n.is_finite() => {
            ws.write_number(row, col, *n)?;
        }
        Cell::Number(n) => {
            ws.write_string(row, col, format_number(*n))?;
        }
        Cell::Boolean(b) => {
            ws.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn row_num(r: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(c: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)
}
