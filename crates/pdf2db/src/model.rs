//! Table types shared by the extractor, normalizer, and gateway.

use std::fmt;

use serde::Serialize;

/// A table as detected on a page, before any cleaning.
///
/// The first row is the header candidate; the remaining rows are data.
/// Cells the detector found no text for are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTable {
    /// 1-based page number the table was found on.
    pub page: usize,
    /// Cell text, row by row.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a raw table from cell text rows.
    pub fn new(page: usize, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { page, rows }
    }

    /// The header candidate, if the table has any rows.
    pub fn header(&self) -> Option<&[Option<String>]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows following the header.
    pub fn data_rows(&self) -> &[Vec<Option<String>>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// A cleaned cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent value, stored as SQL `NULL`.
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form of the value, `None` for [`CellValue::Null`].
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{n}"),
            // Debug keeps the fractional part ("2.0"), so the text parses back as a float.
            CellValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// A cleaned, typed table ready for persistence.
///
/// Every row has exactly `columns.len()` cells. Column names are unique and
/// non-empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values of column `index`, top to bottom.
    #[cfg(test)]
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}
