//! Cleaning and typing of raw tables.
//!
//! A raw table goes through these steps:
//!
//! 1. Column names come from the header row. Blank names become
//!    `column_<n>`, where `n` is the 1-based position in the raw table.
//! 2. Cell text is cleaned: `$` and `,` are removed, non-ASCII characters
//!    are removed, and cells left blank become null.
//! 3. Rows that are entirely null are dropped, then columns that are
//!    entirely null are dropped.
//! 4. Duplicate column names get `_2`, `_3`, ... suffixes. MySQL compares
//!    column names case-insensitively, so `Total` and `total` collide.
//! 5. Each column becomes numeric if every non-null cell parses as a number.
//!    Otherwise it stays text. One column is never partly numeric. Integer
//!    literals outside the `i64` range are not numbers, so long identifiers
//!    such as account numbers keep every digit.

use std::collections::HashSet;

use crate::model::{CellValue, NormalizedTable, RawTable};

/// Normalize a raw table. A table without rows yields an empty table.
pub fn normalize(raw: &RawTable) -> NormalizedTable {
    let Some(header) = raw.header() else {
        return NormalizedTable::default();
    };

    let width = raw.rows.iter().map(Vec::len).max().unwrap_or(0);
    let names = header_names(header, width);

    let rows: Vec<Vec<Option<String>>> = raw
        .data_rows()
        .iter()
        .map(|row| {
            (0..width)
                .map(|i| row.get(i).and_then(|cell| cell.as_deref()).and_then(normalize_cell))
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(Option::is_some))
        .collect();

    let keep: Vec<usize> = (0..width)
        .filter(|&col| rows.iter().any(|row| row[col].is_some()))
        .collect();

    let columns = dedupe_names(keep.iter().map(|&col| names[col].clone()).collect());

    let mut typed: Vec<std::vec::IntoIter<CellValue>> = keep
        .iter()
        .map(|&col| {
            let cells: Vec<Option<String>> = rows.iter().map(|row| row[col].clone()).collect();
            coerce_column(cells).into_iter()
        })
        .collect();

    let rows = (0..rows.len())
        .map(|_| typed.iter_mut().filter_map(Iterator::next).collect())
        .collect();

    NormalizedTable { columns, rows }
}

/// Clean one cell's text. Returns `None` when nothing printable is left.
///
/// Applying this to its own output returns the same value.
pub fn normalize_cell(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii() && !matches!(c, '$' | ','))
        .collect();
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Derive one name per column from the header row.
fn header_names(header: &[Option<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|i| {
            match header.get(i).and_then(|h| h.as_deref()).map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => placeholder_name(i),
            }
        })
        .collect()
}

/// Placeholder for a blank header at 0-based position `index`.
pub fn placeholder_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

/// Make names unique, case-insensitively.
///
/// The first occurrence keeps its name. Later ones get the smallest `_<n>`
/// suffix (n ≥ 2) that is neither one of the input names nor already issued.
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let originals: HashSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let mut issued: HashSet<String> = HashSet::with_capacity(names.len());

    names
        .into_iter()
        .map(|name| {
            if issued.insert(name.to_lowercase()) {
                return name;
            }
            let mut n = 2;
            loop {
                let candidate = format!("{name}_{n}");
                let key = candidate.to_lowercase();
                if !originals.contains(&key) && issued.insert(key) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

enum Number {
    Integer(i64),
    Float(f64),
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::Integer(n));
    }
    if is_integer_literal(text) {
        return None;
    }
    // Reject "inf"/"NaN" spellings that f64 accepts.
    match text.parse::<f64>() {
        Ok(x) if x.is_finite() => Some(Number::Float(x)),
        _ => None,
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Type a column: numeric when every non-null cell is a number, else text.
fn coerce_column(cells: Vec<Option<String>>) -> Vec<CellValue> {
    let parsed: Option<Vec<Option<Number>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => parse_number(text).map(Some),
        })
        .collect();

    let Some(numbers) = parsed else {
        return cells
            .into_iter()
            .map(|cell| cell.map_or(CellValue::Null, CellValue::Text))
            .collect();
    };

    let all_integers = numbers
        .iter()
        .flatten()
        .all(|n| matches!(n, Number::Integer(_)));

    numbers
        .into_iter()
        .map(|n| match n {
            None => CellValue::Null,
            Some(Number::Integer(i)) if all_integers => CellValue::Integer(i),
            Some(Number::Integer(i)) => CellValue::Float(i as f64),
            Some(Number::Float(x)) => CellValue::Float(x),
        })
        .collect()
}
