//! CSV export.

use crate::error::{EngineError, EngineResult};
use crate::types::ProcessedResult;

/// Encode a result as CSV, one line per row.
///
/// Fields containing a comma, double quote, or line break are quoted, with inner quotes
/// doubled. With `include_headers == false` the header line is omitted. A record with no
/// fields, or with a single empty field, is written as an empty line.
pub fn encode_csv(result: &ProcessedResult, include_headers: bool) -> EngineResult<Vec<u8>> {
    let mut out = Vec::new();

    if include_headers {
        write_line(&mut out, &result.headers)?;
    }
    for row in &result.rows {
        let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
        write_line(&mut out, &fields)?;
    }

    Ok(out)
}

// A lone empty field would otherwise be written as `""`.
fn write_line(out: &mut Vec<u8>, fields: &[String]) -> EngineResult<()> {
    match fields {
        [] => {}
        [only] if only.is_empty() => {}
        _ => {
            let mut wtr = csv::WriterBuilder::new()
                .quote_style(csv::QuoteStyle::Necessary)
                .from_writer(&mut *out);
            wtr.write_record(fields)?;
            wtr.flush().map_err(EngineError::Io)?;
            return Ok(());
        }
    }
    out.push(b'\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::encode_csv;
    use crate::types::{Cell, ProcessedResult};

    fn result(headers: &[&str], rows: Vec<Vec<Cell>>) -> ProcessedResult {
        ProcessedResult {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            total_count: rows.len(),
            filtered_count: rows.len(),
            source_columns: Vec::new(),
            rows,
        }
    }

    #[test]
    fn writes_header_then_rows() {
        let r = result(
            &["Name", "Age", "Active"],
            vec![
                vec![Cell::from("Ann"), Cell::Number(30.0), Cell::Boolean(true)],
                vec![Cell::from("Bob"), Cell::Empty, Cell::Boolean(false)],
            ],
        );
        let out = String::from_utf8(encode_csv(&r, true).unwrap()).unwrap();
        assert_eq!(out, "Name,Age,Active\nAnn,30,true\nBob,,false\n");
    }

    #[test]
    fn omits_header_line_when_requested() {
        let r = result(&["Name"], vec![vec![Cell::from("Ann")]]);
        let out = String::from_utf8(encode_csv(&r, false).unwrap()).unwrap();
        assert_eq!(out, "Ann\n");
    }

    #[test]
    fn escapes_quotes_commas_and_newlines() {
        let r = result(
            &["Quote", "Note"],
            vec![vec![Cell::from(r#"He said "hi", bye"#), Cell::from("two\nlines")]],
        );
        let out = String::from_utf8(encode_csv(&r, false).unwrap()).unwrap();
        assert_eq!(out, "\"He said \"\"hi\"\", bye\",\"two\nlines\"\n");

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_bytes());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], r#"He said "hi", bye"#);
        assert_eq!(&record[1], "two\nlines");
    }

    #[test]
    fn header_fields_are_escaped_like_data() {
        let r = result(&["Last, First"], Vec::new());
        let out = String::from_utf8(encode_csv(&r, true).unwrap()).unwrap();
        assert_eq!(out, "\"Last, First\"\n");
    }

    #[test]
    fn lone_empty_field_is_an_empty_line() {
        let r = result(&["Note"], vec![vec![Cell::from("a")], vec![Cell::Empty]]);
        let out = String::from_utf8(encode_csv(&r, true).unwrap()).unwrap();
        assert_eq!(out, "Note\na\n\n");
    }

    #[test]
    fn rows_without_selected_fields_are_empty_lines() {
        let r = result(&[], vec![Vec::new(), Vec::new()]);
        let out = String::from_utf8(encode_csv(&r, true).unwrap()).unwrap();
        assert_eq!(out, "\n\n\n");

        let out = String::from_utf8(encode_csv(&r, false).unwrap()).unwrap();
        assert_eq!(out, "\n\n");
    }

    #[test]
    fn empty_fields_among_others_stay_unquoted() {
        let r = result(&["A", "B"], vec![vec![Cell::Empty, Cell::Empty]]);
        let out = String::from_utf8(encode_csv(&r, false).unwrap()).unwrap();
        assert_eq!(out, ",\n");
    }
}
