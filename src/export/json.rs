//! JSON export.

use serde_json::{Map, Value};

use crate::error::EngineResult;
use crate::types::{Cell, ProcessedResult};

/// Encode a result as a pretty-printed JSON array with one object per row.
///
/// Object keys are the headers, in header order. Empty cells become `""`. A repeated header keeps
/// its first position and takes the value of its last occurrence.
pub fn encode_json(result: &ProcessedResult) -> EngineResult<Vec<u8>> {
    let objects: Vec<Value> = result
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::with_capacity(result.headers.len());
            for (idx, header) in result.headers.iter().enumerate() {
                let value = row.get(idx).map_or_else(|| Value::String(String::new()), cell_to_json);
                obj.insert(header.clone(), value);
            }
            Value::Object(obj)
        })
        .collect();

    Ok(serde_json::to_vec_pretty(&objects)?)
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Empty => Value::String(String::new()),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Boolean(b) => Value::Bool(*b),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::from(*n as i64),
        Cell::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::encode_json;
    use crate::types::{Cell, ProcessedResult};

    fn parse(bytes: Vec<u8>) -> serde_json::Value {
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn rows_become_objects_keyed_by_header() {
        let r = ProcessedResult {
            headers: vec!["Name".to_string(), "Age".to_string()],
            rows: vec![vec![Cell::from("Ann"), Cell::from("30")]],
            total_count: 1,
            filtered_count: 1,
            source_columns: Vec::new(),
        };
        let bytes = encode_json(&r).unwrap();
        assert_eq!(parse(bytes.clone()), json!([{"Name": "Ann", "Age": "30"}]));

        // Keys keep header order.
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.find("\"Name\"").unwrap() < text.find("\"Age\"").unwrap());
    }

    #[test]
    fn typed_cells_keep_their_json_types() {
        let r = ProcessedResult {
            headers: vec!["n".into(), "f".into(), "b".into(), "e".into()],
            rows: vec![vec![
                Cell::Number(3.0),
                Cell::Number(2.5),
                Cell::Boolean(true),
                Cell::Empty,
            ]],
            total_count: 1,
            filtered_count: 1,
            source_columns: Vec::new(),
        };
        assert_eq!(
            parse(encode_json(&r).unwrap()),
            json!([{"n": 3, "f": 2.5, "b": true, "e": ""}])
        );
    }

    #[test]
    fn no_rows_is_an_empty_array() {
        let r = ProcessedResult {
            headers: vec!["A".into()],
            ..Default::default()
        };
        assert_eq!(parse(encode_json(&r).unwrap()), json!([]));
    }
}
