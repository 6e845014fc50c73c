//! The transformation pipeline: filter conjunction plus column projection.

use tracing::debug;

use crate::types::{Cell, ColumnType, FileDataset, FilterCondition, ProcessedResult};

use super::filter::matches;
use super::normalize::{format_value, normalize};

static EMPTY_CELL: Cell = Cell::Empty;

/// Filter and project a dataset.
///
/// - `selected_fields` are resolved to columns by name, in the given order; names with no
///   matching column are dropped.
/// - A data row is kept iff it satisfies every condition. Conditions naming an unknown column
///   are ignored.
/// - Kept rows keep their source order; out-of-range cells project as empty.
///
/// `filtered_count` counts kept rows before projection and `total_count` counts all data rows.
/// The function is pure: identical inputs give identical results.
///
/// # Examples
///
/// ```rust
/// use tabular_refine::processing::project;
/// use tabular_refine::types::{Cell, FileDataset, FilterCondition, FilterOperator};
///
/// let grid = vec![
///     vec![Cell::from("Name"), Cell::from("Age")],
///     vec![Cell::from("Ann"), Cell::from("25")],
///     vec![Cell::from("Bob"), Cell::from("35")],
/// ];
/// let ds = FileDataset::from_grid("people.csv", grid, 100);
/// let conditions = [FilterCondition::new("1", "Age", FilterOperator::GreaterThan, "30")];
///
/// let out = project(&ds, &["Name"], &conditions);
/// assert_eq!(out.headers, vec!["Name"]);
/// assert_eq!(out.rows, vec![vec![Cell::from("Bob")]]);
/// assert_eq!((out.filtered_count, out.total_count), (1, 2));
/// ```
pub fn project<S: AsRef<str>>(
    dataset: &FileDataset,
    selected_fields: &[S],
    conditions: &[FilterCondition],
) -> ProcessedResult {
    if dataset.raw_grid.is_empty() {
        return ProcessedResult::default();
    }

    let selected: Vec<usize> = selected_fields
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let idx = dataset.index_of(name);
            if idx.is_none() {
                debug!(field = name, "ignoring selected field with no matching column");
            }
            idx
        })
        .collect();

    let active: Vec<(usize, ColumnType, &FilterCondition)> = conditions
        .iter()
        .filter_map(|c| match dataset.column(&c.field) {
            Some(col) => Some((col.index, col.column_type, c)),
            None => {
                debug!(field = %c.field, id = %c.id, "ignoring filter on unknown column");
                None
            }
        })
        .collect();

    let header_row = dataset.header_row();
    let headers: Vec<String> = selected
        .iter()
        .map(|&idx| header_row.get(idx).map(Cell::to_string).unwrap_or_default())
        .collect();

    let data_rows = dataset.data_rows();
    let kept: Vec<&Vec<Cell>> = data_rows
        .iter()
        .filter(|row| {
            active.iter().all(|&(idx, column_type, condition)| {
                let cell = row.get(idx).unwrap_or(&EMPTY_CELL);
                matches(&normalize(cell, column_type), condition, column_type)
            })
        })
        .collect();

    let rows: Vec<Vec<Cell>> = kept
        .iter()
        .map(|row| {
            selected
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect();

    debug!(
        total = data_rows.len(),
        kept = kept.len(),
        columns = selected.len(),
        conditions = active.len(),
        "projected dataset"
    );

    ProcessedResult {
        headers,
        rows,
        total_count: data_rows.len(),
        filtered_count: kept.len(),
        source_columns: selected,
    }
}

impl ProcessedResult {
    /// Display strings for every projected cell.
    ///
    /// Each cell is normalized and formatted with the type of the dataset column it was
    /// projected from (see [`ProcessedResult::source_columns`]). Cells without a known source
    /// column format as text.
    pub fn display_rows(&self, dataset: &FileDataset) -> Vec<Vec<String>> {
        let column_type = |pos: usize| {
            self.source_columns
                .get(pos)
                .and_then(|&idx| dataset.columns.get(idx))
                .map_or(ColumnType::Text, |c| c.column_type)
        };

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(pos, cell)| {
                        let ty = column_type(pos);
                        format_value(&normalize(cell, ty), ty)
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
