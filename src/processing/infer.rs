//! Column type inference.

use crate::types::{Cell, ColumnType};

use super::normalize::parse_date;

/// Maximum number of leading values sampled per column when a dataset is built.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Share (in percent) of non-empty sample values a type test must exceed to win.
pub const TYPE_MAJORITY_PERCENT: usize = 80;

/// Lowercase tokens accepted as boolean values during inference.
pub const BOOLEAN_TOKENS: [&str; 8] = ["true", "false", "yes", "no", "1", "0", "y", "n"];

/// Infer a [`ColumnType`] from a sample of raw values.
///
/// Empty values are ignored. The remaining values are tested in a fixed order
/// (Boolean, then Number, then Date); the first test met by more than
/// [`TYPE_MAJORITY_PERCENT`] of the sample wins. An empty sample, or one where no test
/// exceeds that share, is [`ColumnType::Text`].
pub fn infer_type(values: &[Cell]) -> ColumnType {
    let non_empty: Vec<&Cell> = values.iter().filter(|v| !v.is_empty()).collect();
    if non_empty.is_empty() {
        return ColumnType::Text;
    }

    let total = non_empty.len();
    let reaches_majority = |count: usize| count * 100 > total * TYPE_MAJORITY_PERCENT;

    if reaches_majority(non_empty.iter().filter(|v| is_boolean_token(v)).count()) {
        return ColumnType::Boolean;
    }
    if reaches_majority(non_empty.iter().filter(|v| v.to_number().is_finite()).count()) {
        return ColumnType::Number;
    }
    if reaches_majority(non_empty.iter().filter(|v| parse_date(v).is_some()).count()) {
        return ColumnType::Date;
    }
    ColumnType::Text
}

fn is_boolean_token(cell: &Cell) -> bool {
    let lower = cell.to_string().to_lowercase();
    BOOLEAN_TOKENS.contains(&lower.as_str())
}
