//! CSV reading into a [`RawGrid`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::EngineResult;
use crate::types::{Cell, RawGrid};

/// Build the CSV reader used for uploads: no header handling (row 0 stays in the grid) and
/// rows of differing lengths allowed.
pub fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Read a CSV file into a raw grid.
pub fn read_csv_grid_from_path(path: impl AsRef<Path>) -> EngineResult<RawGrid> {
    let mut rdr = csv_reader(File::open(path)?);
    read_csv_grid_from_reader(&mut rdr)
}

/// Read CSV records from an existing reader into a raw grid.
///
/// Rules:
///
/// - Every record becomes a row; row 0 is expected to be the header row.
/// - Non-empty fields become [`Cell::Text`], empty fields [`Cell::Empty`].
/// - Rows whose fields are all empty are skipped.
pub fn read_csv_grid_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> EngineResult<RawGrid> {
    let mut grid: RawGrid = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<Cell> = record.iter().map(Cell::from).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        grid.push(row);
    }
    Ok(grid)
}
