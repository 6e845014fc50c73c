//! Single-condition filter evaluation.

use tracing::trace;

use crate::types::{parse_number, ColumnType, FilterCondition, FilterOperator};

use super::normalize::NormalizedValue;

/// Returns `true` if a normalized cell value satisfies `condition`.
///
/// Text operators compare lowercase string forms. Ordering operators compare numerically;
/// a side with no numeric form never matches. An unrecognized operator matches every value.
pub fn matches(
    value: &NormalizedValue,
    condition: &FilterCondition,
    column_type: ColumnType,
) -> bool {
    let literal = condition.value.as_str();

    match &condition.operator {
        FilterOperator::Equals => lower(value) == literal.to_lowercase(),
        FilterOperator::NotEquals => lower(value) != literal.to_lowercase(),
        FilterOperator::Contains => lower(value).contains(&literal.to_lowercase()),
        FilterOperator::NotContains => !lower(value).contains(&literal.to_lowercase()),
        FilterOperator::StartsWith => lower(value).starts_with(&literal.to_lowercase()),
        FilterOperator::EndsWith => lower(value).ends_with(&literal.to_lowercase()),
        FilterOperator::GreaterThan => value.to_number() > literal_number(literal),
        FilterOperator::LessThan => value.to_number() < literal_number(literal),
        FilterOperator::GreaterEqual => value.to_number() >= literal_number(literal),
        FilterOperator::LessEqual => value.to_number() <= literal_number(literal),
        FilterOperator::IsTrue => value.truthy(),
        FilterOperator::IsFalse => !value.truthy(),
        FilterOperator::IsEmpty => value.is_empty(),
        FilterOperator::IsNotEmpty => !value.is_empty(),
        FilterOperator::Unknown(name) => {
            trace!(operator = %name, %column_type, "unrecognized filter operator matches all rows");
            true
        }
    }
}

fn lower(value: &NormalizedValue) -> String {
    value.to_text().to_lowercase()
}

fn literal_number(literal: &str) -> f64 {
    parse_number(literal).unwrap_or(f64::NAN)
}
