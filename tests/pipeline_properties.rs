use tabular_refine::processing::{
    infer_type, normalize, project, NormalizedValue, DEFAULT_SAMPLE_SIZE,
};
use tabular_refine::types::{Cell, ColumnType, FileDataset, FilterCondition, FilterOperator};

fn dataset(rows: &[&[&str]]) -> FileDataset {
    let grid = rows
        .iter()
        .map(|r| r.iter().map(|s| Cell::from(*s)).collect())
        .collect();
    FileDataset::from_grid("test.csv", grid, DEFAULT_SAMPLE_SIZE)
}

fn cells(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|s| Cell::from(*s)).collect()
}

#[test]
fn boolean_majority_wins_over_minority_text() {
    let values = cells(&["yes", "no", "yes", "y", "n", "maybe"]);
    assert_eq!(infer_type(&values), ColumnType::Boolean);
}

#[test]
fn numeric_majority_without_boolean_majority_is_number() {
    let values = cells(&["12", "3.5", "-7", "1000", "64", "n/a"]);
    assert_eq!(infer_type(&values), ColumnType::Number);
}

#[test]
fn exactly_eighty_percent_does_not_win() {
    let values = cells(&["12", "3.5", "-7", "1000", "n/a"]);
    assert_eq!(infer_type(&values), ColumnType::Text);
}

#[test]
fn no_majority_is_text() {
    let values = cells(&["12", "abc", "2024-01-01", "yes", "hello"]);
    assert_eq!(infer_type(&values), ColumnType::Text);
}

#[test]
fn normalize_is_total_for_dirty_input() {
    let dirty = [
        Cell::Empty,
        Cell::from("abc"),
        Cell::from("  "),
        Cell::Number(f64::NAN),
        Cell::Number(f64::INFINITY),
        Cell::Boolean(false),
        Cell::from("31/31/2031"),
    ];
    for cell in &dirty {
        for ty in [ColumnType::Text, ColumnType::Number, ColumnType::Boolean, ColumnType::Date] {
            let _ = normalize(cell, ty);
        }
    }

    assert_eq!(normalize(&Cell::from("abc"), ColumnType::Number), NormalizedValue::Number(0.0));
    assert_eq!(normalize(&Cell::from("not a date"), ColumnType::Date), NormalizedValue::Date(None));
}

#[test]
fn empty_condition_list_keeps_every_row() {
    let ds = dataset(&[&["A"], &["1"], &["2"], &["3"]]);
    let out = project(&ds, &["A"], &[]);
    assert_eq!(out.filtered_count, out.total_count);
    assert_eq!(out.total_count, 3);
}

#[test]
fn greater_than_filters_out_small_and_non_numeric_values() {
    let ds = dataset(&[&["Age"], &["25"], &["35"], &["abc"]]);
    let conditions = [FilterCondition::new("1", "Age", FilterOperator::GreaterThan, "30")];

    let out = project(&ds, &["Age"], &conditions);
    assert_eq!(out.filtered_count, 1);
    assert_eq!(out.rows, vec![vec![Cell::from("35")]]);
}

#[test]
fn projection_follows_selection_order() {
    let ds = dataset(&[&["A", "B"], &["a1", "b1"]]);
    let out = project(&ds, &["B", "A"], &[]);
    assert_eq!(out.headers, vec!["B", "A"]);
    assert_eq!(out.rows, vec![vec![Cell::from("b1"), Cell::from("a1")]]);
}

#[test]
fn dangling_references_are_ignored() {
    let ds = dataset(&[&["A", "B"], &["1", "x"], &["2", "y"]]);
    let conditions = [FilterCondition::new("1", "Missing", FilterOperator::Equals, "nothing")];

    let out = project(&ds, &["A", "Missing", "B"], &conditions);
    assert_eq!(out.headers, vec!["A", "B"]);
    assert_eq!(out.filtered_count, 2);
}

#[test]
fn filtered_count_is_independent_of_selection() {
    let ds = dataset(&[&["A", "B"], &["1", "x"], &["2", "y"], &["3", "x"]]);
    let conditions = [FilterCondition::new("1", "B", FilterOperator::Equals, "X")];

    let wide = project(&ds, &["A", "B"], &conditions);
    let none: Vec<&str> = Vec::new();
    let narrow = project(&ds, &none, &conditions);
    assert_eq!(wide.filtered_count, 2);
    assert_eq!(narrow.filtered_count, 2);
    assert!(narrow.headers.is_empty());
}

#[test]
fn short_rows_project_as_empty_cells() {
    let ds = dataset(&[&["A", "B", "C"], &["1"]]);
    let out = project(&ds, &["C", "A"], &[]);
    assert_eq!(out.rows, vec![vec![Cell::Empty, Cell::from("1")]]);
}

#[test]
fn project_is_idempotent() {
    let ds = dataset(&[&["Name", "Active"], &["Ann", "yes"], &["Bob", "no"]]);
    let conditions = [
        FilterCondition::new("1", "Active", FilterOperator::IsTrue, ""),
        FilterCondition::new("2", "Name", FilterOperator::from("sounds_like"), "an"),
    ];

    let first = project(&ds, &["Name"], &conditions);
    let second = project(&ds, &["Name"], &conditions);
    assert_eq!(first, second);
    assert_eq!(first.rows, vec![vec![Cell::from("Ann")]]);
}
