//! CSV input and output for lead tables.
//!
//! Short rows are padded with `null`, while a row with more cells than the
//! header is an error. NA spellings become `null` and each column is typed
//! as integer, float, boolean or text depending on what all of its cells
//! parse as.

use crate::errors::{AppError, ResultExt};
use crate::models::{render_value, LeadRecord, LeadTable};
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Cell contents read as `null`.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

/// Loads a lead table from a CSV file.
pub fn load_leads(path: &Path) -> Result<LeadTable, AppError> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_leads(file).with_context(|| format!("parsing {}", path.display()))
}

/// Reads a lead table from any CSV source. The first row is the header.
pub fn read_leads<R: Read>(reader: R) -> Result<LeadTable, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = dedupe_columns(
        csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect(),
    );

    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.len() > columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::InternalError(format!(
                "expected {} fields in line {}, saw {}",
                columns.len(),
                line,
                record.len()
            )));
        }
        let row = (0..columns.len())
            .map(|i| record.get(i).filter(|raw| !is_null_token(raw)).map(str::to_string))
            .collect();
        cells.push(row);
    }

    let kinds: Vec<ColumnKind> = (0..columns.len())
        .map(|i| infer_kind(cells.iter().map(|row| row[i].as_deref())))
        .collect();

    let rows = cells
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .zip(kinds.iter())
                .zip(row)
                .map(|((name, kind), cell)| (name.clone(), typed_value(cell, *kind)))
                .collect::<LeadRecord>()
        })
        .collect();

    tracing::debug!("Read {} lead columns", columns.len());
    Ok(LeadTable::new(columns, rows))
}

/// Writes a lead table as CSV: one header row, then one row per record.
///
/// `null` and absent fields are written as empty cells. Nothing is written for
/// a table without columns.
pub fn write_leads<W: Write>(table: &LeadTable, writer: W) -> Result<(), AppError> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(table.columns().iter().map(|column| {
            row.get(column)
                .and_then(render_value)
                .unwrap_or_default()
        }))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw)
}

/// Repeated header names get a numeric suffix: `region`, `region.1`, ...
fn dedupe_columns(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut name = header.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", header, n);
            n += 1;
        }
        seen.push(name);
    }
    seen
}

fn infer_kind<'a, I>(cells: I) -> ColumnKind
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut has_null = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut any_value = false;

    for cell in cells {
        let Some(raw) = cell else {
            has_null = true;
            continue;
        };
        any_value = true;
        all_int = all_int && raw.parse::<i64>().is_ok();
        all_float = all_float && parse_finite(raw).is_some();
        all_bool = all_bool && parse_bool(raw).is_some();
    }

    if !any_value {
        ColumnKind::Text
    } else if all_int && !has_null {
        ColumnKind::Integer
    } else if all_float {
        ColumnKind::Float
    } else if all_bool && !has_null {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

fn typed_value(cell: Option<String>, kind: ColumnKind) -> Value {
    let Some(raw) = cell else {
        return Value::Null;
    };
    let typed = match kind {
        ColumnKind::Integer => raw.parse::<i64>().ok().map(Value::from),
        ColumnKind::Float => parse_finite(&raw)
            .and_then(Number::from_f64)
            .map(Value::Number),
        ColumnKind::Boolean => parse_bool(&raw).map(Value::Bool),
        ColumnKind::Text => None,
    };
    typed.unwrap_or(Value::String(raw))
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_columns() {
        let columns = dedupe_columns(vec!["a".into(), "b".into(), "a".into(), "a".into()]);
        assert_eq!(columns, vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn test_infer_kind() {
        let kind = |cells: &[Option<&str>]| infer_kind(cells.iter().copied());

        assert_eq!(kind(&[Some("1"), Some("2")]), ColumnKind::Integer);
        assert_eq!(kind(&[Some("1"), None]), ColumnKind::Float);
        assert_eq!(kind(&[Some("1.5"), Some("2")]), ColumnKind::Float);
        assert_eq!(kind(&[Some("True"), Some("false")]), ColumnKind::Boolean);
        assert_eq!(kind(&[Some("1"), Some("x")]), ColumnKind::Text);
        assert_eq!(kind(&[Some("inf")]), ColumnKind::Text);
        assert_eq!(kind(&[None, None]), ColumnKind::Text);
    }

    #[test]
    fn test_null_tokens() {
        assert!(is_null_token(""));
        assert!(is_null_token("NA"));
        assert!(is_null_token("nan"));
        assert!(is_null_token("1.#IND"));
        assert!(is_null_token("-1.#QNAN"));
        assert!(!is_null_token(" "));
        assert!(!is_null_token("none"));
    }
}
